// tests/scenarios.rs

//! End-to-end evaluation scenarios for the bundled beauty recipe.

mod common;

use common::{beauty_recipe, raw_options, FakeTool, Workspace};
use sous::recipe::kitchen::BuildState;
use sous::recipe::{plan, BuildType, Os, StepOutput};
use sous::{AmbientConfig, Error, EvaluationStatus, Kitchen, Settings};
use std::sync::Arc;

fn settings(os: Os) -> Settings {
    Settings::new(os, "gcc", BuildType::Release, "x86_64")
}

fn names(requirements: &[sous::recipe::Requirement]) -> Vec<&str> {
    requirements.iter().map(|r| r.name.as_str()).collect()
}

#[test]
fn test_scenario_a_linux_static_with_tls() {
    let recipe = beauty_recipe();
    let raw = raw_options(&[("shared", "False"), ("openssl", "True")]);
    let plan = plan(&recipe, &raw, &settings(Os::Linux), &AmbientConfig::default()).unwrap();

    assert_eq!(plan.options.get("fPIC"), Some(true));
    assert_eq!(plan.options.get("shared"), Some(false));

    assert_eq!(names(&plan.requirements), vec!["boost", "openssl"]);
    let openssl = &plan.requirements[1];
    assert!(openssl.transitive_headers);
    assert!(openssl.transitive_libs);

    assert_eq!(plan.consumer.system_libs, vec!["pthread"]);
    assert_eq!(plan.consumer.defines, vec!["BEAUTY_ENABLE_OPENSSL"]);
    assert_eq!(plan.generated.get("BEAUTY_ENABLE_OPENSSL"), Some("ON"));
}

#[test]
fn test_scenario_b_windows_shared_without_tls() {
    let recipe = beauty_recipe();
    let raw = raw_options(&[("shared", "True"), ("openssl", "False")]);
    let plan = plan(&recipe, &raw, &settings(Os::Windows), &AmbientConfig::default()).unwrap();

    assert!(!plan.options.contains("fPIC"));
    assert!(plan.options.is_removed("fPIC"));
    assert_eq!(names(&plan.requirements), vec!["boost"]);
    assert_eq!(plan.consumer.system_libs, vec!["crypt32"]);
    assert!(plan.consumer.defines.is_empty());
    assert_eq!(plan.generated.get("BUILD_SHARED_LIBS"), Some("ON"));
    assert_eq!(plan.generated.get("CMAKE_POSITION_INDEPENDENT_CODE"), None);
}

#[test]
fn test_shared_removes_pic_even_when_requested() {
    let recipe = beauty_recipe();
    let raw = raw_options(&[("shared", "True"), ("fPIC", "True")]);
    let plan = plan(&recipe, &raw, &settings(Os::Linux), &AmbientConfig::default()).unwrap();
    assert_eq!(plan.options.get("fPIC"), None);
    assert_eq!(plan.options.get("shared"), Some(true));
}

#[test]
fn test_invalid_option_value_is_rejected() {
    let recipe = beauty_recipe();
    let raw = raw_options(&[("shared", "maybe")]);
    let err = plan(&recipe, &raw, &settings(Os::Linux), &AmbientConfig::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidOptionValue { ref option, .. } if option == "shared"));
}

#[test]
fn test_unknown_option_is_rejected() {
    let recipe = beauty_recipe();
    let raw = raw_options(&[("with_zlib", "True")]);
    let err = plan(&recipe, &raw, &settings(Os::Linux), &AmbientConfig::default()).unwrap_err();
    assert!(matches!(err, Error::UnknownOption(_)));
}

#[test]
fn test_scenario_c_skip_tests() {
    let ws = Workspace::new();
    let tool = Arc::new(FakeTool::passing());
    let ambient = AmbientConfig {
        skip_tests: true,
        ..Default::default()
    };
    let kitchen = Kitchen::new(ws.config().with_ambient(ambient), tool.clone());

    let evaluation = kitchen
        .evaluate(&beauty_recipe(), &raw_options(&[]), &settings(Os::Linux))
        .unwrap();

    assert_eq!(
        evaluation.report.states,
        vec![BuildState::Configured, BuildState::Built, BuildState::Done]
    );
    assert!(!tool.called("test"));
    assert_eq!(evaluation.status(), EvaluationStatus::Success);
}

#[test]
fn test_scenario_d_configure_failure_skips_packaging() {
    let ws = Workspace::new();
    let tool = Arc::new(FakeTool {
        configure: StepOutput::failed(1, "CMake Error: Could NOT find Boost"),
        ..FakeTool::passing()
    });
    let kitchen = Kitchen::new(ws.config(), tool.clone());

    let err = kitchen
        .evaluate(&beauty_recipe(), &raw_options(&[]), &settings(Os::Linux))
        .unwrap_err();

    assert_eq!(err.status(), Some(EvaluationStatus::ConfigurationError));
    let failure = err.step_failure().unwrap();
    assert_eq!(failure.status, Some(1));
    assert!(failure.stderr.contains("Boost"));

    assert_eq!(tool.calls(), vec!["configure"]);
    assert!(!ws.config().package_dir.exists());
}

#[test]
fn test_invalid_option_fails_before_any_step() {
    let ws = Workspace::new();
    let tool = Arc::new(FakeTool::passing());
    let kitchen = Kitchen::new(ws.config(), tool.clone());

    let err = kitchen
        .evaluate(
            &beauty_recipe(),
            &raw_options(&[("openssl", "sometimes")]),
            &settings(Os::Linux),
        )
        .unwrap_err();

    assert!(matches!(err, Error::InvalidOptionValue { .. }));
    assert!(tool.calls().is_empty());
    assert!(!ws.config().generators_dir().exists());
}
