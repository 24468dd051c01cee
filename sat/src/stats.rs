use std::fmt::{Display, Error, Formatter};
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub solves: u64,
    pub restarts: u64,
    pub decisions: u64,
    pub conflicts: u64,
    pub propagations: u64,
    pub learnt_literals: u64,
    pub reductions: u64,
    pub solve_time: Duration,
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        let cpu_time = self.solve_time.as_secs_f64();
        let per_sec = |n: u64| if cpu_time > 0.0 { n as f64 / cpu_time } else { 0.0 };

        writeln!(f, "solves                : {:<12}", self.solves)?;
        writeln!(f, "restarts              : {:<12}", self.restarts)?;
        writeln!(
            f,
            "conflicts             : {:<12}   ({:.0} /sec)",
            self.conflicts,
            per_sec(self.conflicts)
        )?;
        writeln!(
            f,
            "decisions             : {:<12}   ({:.0} /sec)",
            self.decisions,
            per_sec(self.decisions)
        )?;
        writeln!(
            f,
            "propagations          : {:<12}   ({:.0} /sec)",
            self.propagations,
            per_sec(self.propagations)
        )?;
        writeln!(f, "learnt literals       : {:<12}", self.learnt_literals)?;
        writeln!(f, "db reductions         : {:<12}", self.reductions)?;
        writeln!(f, "CPU time              : {cpu_time} s")
    }
}
