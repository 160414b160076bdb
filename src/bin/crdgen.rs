//! # CRD Generator
//!
//! Prints the `OnePasswordItem` CustomResourceDefinition as YAML.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin crdgen > config/crd/onepassworditem.yaml
//! cargo run --bin crdgen | kubectl apply -f -
//! ```

use kube::CustomResourceExt;
use onepassword_secret_controller::crd::OnePasswordItem;

fn main() {
    let crd = OnePasswordItem::crd();

    match serde_yaml::to_string(&crd) {
        Ok(yaml) => {
            println!("# This file is auto-generated by crdgen");
            println!("# DO NOT EDIT THIS FILE MANUALLY");
            println!("---");
            print!("{yaml}");
        }
        Err(e) => {
            eprintln!("Error serializing CRD to YAML: {e}");
            std::process::exit(1);
        }
    }
}
