//! Explains every instance of the SDD classifiers of the `models/sdd` folder.
//!
//! Each (sdd, vtree, map, csv) quadruple with the same name gives a test.

mod common;

use test_each_file::test_each_file;
use xdd_diagram::io::{sdd::parse_sdd, vtree::parse_vtree};
use xdd_diagram::{Manager, Session};
use xdd_explain::{parse_instances, Assignment, FeatureMap};

test_each_file! { for ["sdd", "vtree", "map", "csv"] in "./explain/tests/models/sdd" => test }

fn test([sdd, vtree, map, csv]: [&str; 4]) {
    let manager = Manager::with_order(&parse_vtree(vtree).unwrap()).unwrap();
    let root = manager.compile(&parse_sdd(sdd).unwrap()).unwrap();
    let session = Session::new(&manager, root);
    let map: FeatureMap = map.parse().unwrap();

    let instances = parse_instances(csv);
    assert!(!instances.is_empty());
    for values in &instances {
        let assignment = Assignment::encode(&map, values).unwrap();
        common::check_instance(&session, &assignment);
    }
}
