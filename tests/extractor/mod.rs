// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(test)]

use std::collections::HashSet;
use std::env;

use anyhow::{bail, Result};
use serde::Deserialize;
use test_generator::test_resources;
use try_extractor::*;

#[derive(Deserialize, Debug)]
struct TestCase {
    note: String,
    expr: ExprRef,
    want_result: Option<Vec<String>>,
    error: Option<String>,
    skip: Option<bool>,
}

#[derive(Deserialize, Debug)]
struct YamlTest {
    cases: Vec<TestCase>,
}

fn check_output(computed: &[ExprRef], expected: &[String]) -> Result<()> {
    let computed: Vec<String> = computed.iter().map(|e| e.to_string()).collect();
    if computed != expected {
        bail!(
            "\nleft  = {}\nright = {}\n",
            serde_json::to_string_pretty(&computed)?,
            serde_json::to_string_pretty(expected)?
        );
    }
    Ok(())
}

// Every extracted payload must be a node of the input tree, not a copy.
fn check_identity(root: &ExprRef, computed: &[ExprRef]) -> Result<()> {
    let mut nodes = HashSet::new();
    traverse(root, &mut |node| {
        nodes.insert(node.clone());
        Ok(true)
    })?;

    for payload in computed {
        if !nodes.contains(payload) {
            bail!("`{payload}` is not a node of the input tree");
        }
    }
    Ok(())
}

fn yaml_test_impl(file: &str) -> Result<()> {
    let yaml_str = std::fs::read_to_string(file)?;
    let test: YamlTest = serde_yaml::from_str(&yaml_str)?;

    println!("running {file}");

    for case in test.cases {
        print!("case {} ", case.note);
        if case.skip == Some(true) {
            println!("skipped");
            continue;
        }

        match (&case.want_result, &case.error) {
            (Some(_), None) | (None, Some(_)) => (),
            _ => panic!("either want_result or error must be specified in test case."),
        }

        let recursive = extract_try_expressions(&case.expr);
        let iterative = extract_try_expressions_iterative(&case.expr);
        if recursive != iterative {
            bail!("recursive and iterative extraction differ: {recursive:?} != {iterative:?}");
        }

        match recursive {
            Ok(results) => match &case.want_result {
                Some(want_result) => {
                    check_output(&results, want_result)?;
                    check_identity(&case.expr, &results)?;
                }
                _ => bail!("extraction succeeded and did not produce any errors"),
            },
            Err(actual) => match &case.error {
                Some(expected) => {
                    let actual = actual.to_string();
                    if !actual.contains(expected) {
                        bail!(
                            "Error message\n`{}\n`\ndoes not contain `{}`",
                            actual,
                            expected
                        );
                    }
                    println!("{actual}");
                }
                _ => return Err(actual.into()),
            },
        }

        println!("passed");
    }

    Ok(())
}

fn yaml_test(file: &str) -> Result<()> {
    match yaml_test_impl(file) {
        Ok(_) => Ok(()),
        Err(e) => {
            // If Err is returned, it doesn't always get printed by cargo test.
            // Therefore, panic with the error.
            panic!("{}", e);
        }
    }
}

#[test_resources("tests/extractor/cases/*.yaml")]
fn run(path: &str) {
    yaml_test(path).unwrap()
}

#[test]
#[ignore = "intended for running a single yaml file"]
fn one_yaml() -> Result<()> {
    let _ = env_logger::try_init();

    let mut file = String::default();
    for a in env::args() {
        if a.ends_with(".yaml") {
            file = a;
        }
    }

    if file.is_empty() {
        bail!("missing <yaml-file>");
    }

    yaml_test(file.as_str())
}
