//! Explains every instance of the d-DNNF classifiers of the `models/nnf` folder.
//!
//! Each (nnf, map, csv) triple with the same name gives a test.

mod common;

use test_each_file::test_each_file;
use xdd_diagram::io::nnf::parse_nnf;
use xdd_diagram::{Manager, Session};
use xdd_explain::{parse_instances, Assignment, FeatureMap};

test_each_file! { for ["nnf", "map", "csv"] in "./explain/tests/models/nnf" => test }

fn test([nnf, map, csv]: [&str; 3]) {
    let circuit = parse_nnf(nnf).unwrap();
    let manager = Manager::new(circuit.num_vars()).unwrap();
    let session = Session::new(&manager, manager.compile(&circuit).unwrap());
    let map: FeatureMap = map.parse().unwrap();

    for values in parse_instances(csv) {
        let assignment = Assignment::encode(&map, &values).unwrap();
        common::check_instance(&session, &assignment);
    }
}
