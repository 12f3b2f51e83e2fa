use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

const ANODE_NOTEBOOK: &str = r#"
title = "Anode only"

[[constant]]
name = "iridium_production"
value = "1e4 kg/yr"
citation = "Minke et al. 2021"

[[constant]]
name = "iridium_loading"
value = "2 mg/cm^2"
citation = "assumed"

[[constant]]
name = "current_density"
value = "2 A/cm^2"
citation = "Carmo et al. 2013"

[[constant]]
name = "thermodynamic_potential"
value = "1.23 V"
citation = "textbook"

[[problem]]
name = "anode_rate"
title = "Deployment rate limited by iridium"
expression = "iridium_production / iridium_loading * current_density * thermodynamic_potential"
unit = "GW/yr"
"#;

fn write_file(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn run_builtin_notebook() {
    cargo_bin_cmd!("pgm-demand")
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("max_deployment_rate_pem_cathode = 246 GW/yr"))
        .stdout(predicate::str::contains(
            "years_to_world_capacity_2030_cathode = 6.0976 yr",
        ))
        .stdout(predicate::str::contains("max_deployment_rate_pem_anode = 12.3 GW/yr"))
        .stdout(predicate::str::contains(
            "years_to_world_capacity_2030_anode = 121.95 yr",
        ));
}

#[test]
fn run_json_report() {
    let out = cargo_bin_cmd!("pgm-demand")
        .args(["run", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let report: Value = serde_json::from_slice(&out).expect("valid json output");

    assert_eq!(report["results"][0]["name"], "max_deployment_rate_pem_cathode");
    assert_eq!(report["results"][0]["unit"], "GW/yr");
    assert_eq!(report["results"][3]["dimension"], "time");
}

#[test]
fn run_with_override() {
    cargo_bin_cmd!("pgm-demand")
        .args(["run", "--set", "platinum_loading=0.2 mg/cm^2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("max_deployment_rate_pem_cathode = 2460 GW/yr"));
}

#[test]
fn run_notebook_file() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "anode.toml", ANODE_NOTEBOOK);

    cargo_bin_cmd!("pgm-demand")
        .args(["run", "--notebook", &path])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Anode only"))
        .stdout(predicate::str::contains("anode_rate = 12.3 GW/yr"));
}

#[test]
fn run_fails_when_a_problem_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "broken.toml",
        r#"
[[constant]]
name = "production"
value = "1e4 kg/yr"
citation = "x"

[[constant]]
name = "capacity"
value = "1500 GW"
citation = "x"

[[problem]]
name = "nonsense"
expression = "production + capacity"
"#,
    );

    cargo_bin_cmd!("pgm-demand")
        .args(["run", "--notebook", &path])
        .assert()
        .failure()
        .stdout(predicate::str::contains("nonsense: error: Dimension mismatch"))
        .stderr(predicate::str::contains("1 of 1 problem(s) failed"));
}

#[test]
fn run_rejects_invalid_notebook() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "undefined.toml",
        "[[problem]]\nname = \"x\"\nexpression = \"missing * 2\"\n",
    );

    cargo_bin_cmd!("pgm-demand")
        .args(["run", "--notebook", &path])
        .assert()
        .failure()
        .stderr(predicate::str::contains("undefined name 'missing'"));
}

#[test]
fn config_changes_display() {
    let dir = TempDir::new().unwrap();
    let config = write_file(
        &dir,
        "settings.toml",
        "[output]\nsignificant_digits = 3\n\n[results]\nyears_to_world_capacity_2030_anode = \"d\"\n",
    );

    cargo_bin_cmd!("pgm-demand")
        .args(["--config", &config, "run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("years_to_world_capacity_2030_cathode = 6.1 yr"))
        .stdout(predicate::str::contains("years_to_world_capacity_2030_anode = 44500 d"));
}

#[test]
fn constants_lists_citations() {
    cargo_bin_cmd!("pgm-demand")
        .arg("constants")
        .assert()
        .success()
        .stdout(predicate::str::contains("platinum_production = 200000 kg/yr"))
        .stdout(predicate::str::contains("source: Minke et al., Int. J. Hydrogen Energy (2021)"));
}

#[test]
fn constants_as_json() {
    let output = cargo_bin_cmd!("pgm-demand")
        .args(["constants", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    let constants = value.as_array().unwrap();
    let production = constants
        .iter()
        .find(|c| c["name"] == "platinum_production")
        .unwrap();
    assert_eq!(production["quantity"]["magnitude"], 200000.0);
    assert_eq!(production["quantity"]["unit"], "kg/yr");
}

#[test]
fn verbose_flag_is_global() {
    cargo_bin_cmd!("pgm-demand")
        .args(["convert", "1500 GW", "TW", "-v"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1.5 TW"));
}

#[test]
fn eval_expression_with_results_in_scope() {
    cargo_bin_cmd!("pgm-demand")
        .args([
            "eval",
            "max_deployment_rate_pem_cathode / max_deployment_rate_pem_anode",
        ])
        .assert()
        .success()
        .stdout("20\n");

    cargo_bin_cmd!("pgm-demand")
        .args(["eval", "platinum_production / platinum_loading", "--to", "km^2/yr"])
        .assert()
        .success()
        .stdout("10 km^2/yr\n");
}

#[test]
fn convert_quantity() {
    cargo_bin_cmd!("pgm-demand")
        .args(["convert", "1500 GW", "TW"])
        .assert()
        .success()
        .stdout("1500 GW = 1.5 TW\n");

    cargo_bin_cmd!("pgm-demand")
        .args(["convert", "2e5 kg/yr", "GW"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dimension mismatch"));
}

#[test]
fn dimension_of_quantity() {
    cargo_bin_cmd!("pgm-demand")
        .args(["dimension", "246 GW/yr"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dimension: deployment_rate"));

    cargo_bin_cmd!("pgm-demand")
        .args(["dimension", "2 mg/cm^2", "--expect", "mass_rate"])
        .assert()
        .failure();
}

#[test]
fn units_listing() {
    cargo_bin_cmd!("pgm-demand")
        .arg("units")
        .assert()
        .success()
        .stdout(predicate::str::contains("yr (year)"))
        .stdout(predicate::str::contains("deployment_rate"));
}
