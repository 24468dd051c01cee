use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use itertools::Itertools;
use std::cell::Cell;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Instant;
use xdd_diagram::io::{nnf::read_nnf, sdd::read_sdd, vtree::read_vtree};
use xdd_diagram::{Manager, Session};
use xdd_explain::verify::check_family_duality;
use xdd_explain::{read_instances, Assignment, Explainer, FeatureMap, Marco, Verdict, Verifier};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ClassifierKind {
    /// Sentential decision diagram, in the libsdd format
    Sdd,
    /// d-DNNF circuit, in the c2d format
    Ddnnf,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum XpType {
    Axp,
    Cxp,
}

/// Computes formal explanations of the predictions of a classifier compiled into a decision diagram.
///
/// Example: xdd-explain -c sdd -g xd6.sdd -t xd6.vtree -m xd6.map -i xd6.csv -x axp
#[derive(Parser, Debug)]
#[clap(name = "xdd-explain")]
struct Opt {
    /// Kind of the classifier
    #[clap(short, long, value_enum)]
    classifier: ClassifierKind,
    /// Classifier file
    #[clap(short = 'g', long = "dag")]
    dag: PathBuf,
    /// Vtree file, giving the variable order of an SDD
    #[clap(short = 't', long)]
    vtree: Option<PathBuf>,
    /// Feature map
    #[clap(short, long)]
    map: PathBuf,
    /// Instance file
    #[clap(short, long)]
    inst: PathBuf,
    /// Be verbose: also print the names of the features of each explanation
    #[clap(short, long = "verb", action = clap::ArgAction::Count)]
    verb: u8,
    /// Explanation to compute when not listing all of them
    #[clap(short = 'x', long, value_enum, default_value = "axp")]
    xtype: XpType,
    /// List all explanations
    #[clap(short, long)]
    all: bool,
    /// Logging level to use: one of "error", "warn", "info", "debug", "trace"
    #[clap(short, long, default_value = "warn")]
    log_level: tracing::Level,
}

fn main() -> Result<()> {
    let opt = Opt::parse();

    // set up logger
    let subscriber = tracing_subscriber::fmt()
        .with_timer(tracing_subscriber::fmt::time::Uptime::from(Instant::now()))
        .with_max_level(opt.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let circuit = match opt.classifier {
        ClassifierKind::Sdd => read_sdd(&opt.dag),
        ClassifierKind::Ddnnf => read_nnf(&opt.dag),
    }
    .with_context(|| format!("could not load classifier {}", opt.dag.display()))?;
    let manager = match (&opt.vtree, opt.classifier) {
        (Some(vtree), ClassifierKind::Sdd) => {
            let order = read_vtree(vtree)
                .with_context(|| format!("could not read vtree {}", vtree.display()))?;
            Manager::with_order(&order)?
        }
        (Some(_), ClassifierKind::Ddnnf) => {
            tracing::warn!("the vtree is ignored for d-DNNF classifiers");
            Manager::new(circuit.num_vars())?
        }
        (None, _) => Manager::new(circuit.num_vars())?,
    };
    let root = manager
        .compile(&circuit)
        .with_context(|| format!("could not compile classifier {}", opt.dag.display()))?;
    let session = Session::new(&manager, root);

    let map = FeatureMap::read(&opt.map)
        .with_context(|| format!("could not read feature map {}", opt.map.display()))?;
    let instances = read_instances(&opt.inst)
        .with_context(|| format!("could not read instances {}", opt.inst.display()))?;

    let printer = Printer {
        map: &map,
        names: opt.verb > 0,
        last: Cell::new(Instant::now()),
    };
    let mut failures = 0;
    for (idx, values) in instances.iter().enumerate() {
        println!("#{idx}-th instance {values:?}");
        let assignment =
            Assignment::encode(&map, values).with_context(|| format!("invalid instance #{idx}"))?;
        let explainer = Explainer::new(&session);
        let verifier = Verifier::new(&session);

        let mut verdicts = Vec::new();
        printer.restart();
        if opt.all {
            println!("list all XPs ...");
            let mut marco = Marco::new(explainer, &assignment)?;
            let res = marco.run(|axp| printer.xp("AXp", axp), |cxp| printer.xp("CXp", cxp));
            println!("#AXp: {}", res.axps.len());
            println!("#CXp: {}", res.cxps.len());
            println!("Runtime: {:.4}", res.run_time.as_secs_f64());
            for axp in &res.axps {
                verdicts.push(verifier.check_axp(&assignment, axp)?);
            }
            for cxp in &res.cxps {
                verdicts.push(verifier.check_cxp(&assignment, cxp)?);
            }
            verdicts.push(check_family_duality(&res.axps, &res.cxps));
        } else {
            match opt.xtype {
                XpType::Axp => {
                    println!("find an axp ...");
                    let axp = explainer.find_axp(&assignment, None)?;
                    printer.xp("AXp", &axp);
                    verdicts.push(verifier.check_axp(&assignment, &axp)?);
                }
                XpType::Cxp => {
                    println!("find a cxp ...");
                    let cxp = explainer.find_cxp(&assignment, None)?;
                    printer.xp("CXp", &cxp);
                    verdicts.push(verifier.check_cxp(&assignment, &cxp)?);
                }
            }
        }

        for verdict in verdicts {
            if let Verdict::Invalid(defect) = verdict {
                println!("verification failed: {defect}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} verification(s) failed");
    }
    Ok(())
}

/// Prints each explanation with the time spent since the previous one.
struct Printer<'a> {
    map: &'a FeatureMap,
    names: bool,
    last: Cell<Instant>,
}

impl Printer<'_> {
    fn restart(&self) {
        self.last.set(Instant::now());
    }

    fn xp(&self, kind: &str, features: &BTreeSet<usize>) {
        let indices = features.iter().collect_vec();
        match self.map.names(features) {
            Some(names) if self.names => println!("{kind}: {indices:?} ({})", names.join(", ")),
            _ => println!("{kind}: {indices:?}"),
        }
        println!("Runtime: {:.4}", self.last.get().elapsed().as_secs_f64());
        self.restart();
    }
}
