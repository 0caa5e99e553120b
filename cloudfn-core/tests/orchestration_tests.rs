// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Deploy sequencing and describe mapping against recording collaborators.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Utc};

use cloudfn_core::{
    BuildError, BuildToolchain, CommandError, DeployError, DeployStep, Deployer, DeploymentRequest,
    DescribeError, DescriptionFetcher, EnvConfigRef, Environment, FunctionLifecycle,
    FunctionService, FunctionStatus, RemoteFunctionInfo, ServiceError,
};

/// A collaborator call that completed successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Delete(String),
    Build(String),
    Deploy {
        function: String,
        environment: Environment,
        env_config: EnvConfigRef,
        revision: Option<String>,
    },
    Describe(String),
}

/// Shared log of completed calls plus a count of every attempt.
#[derive(Debug, Clone, Default)]
struct Recorder {
    calls: Rc<RefCell<Vec<Call>>>,
    attempts: Rc<RefCell<usize>>,
}

impl Recorder {
    fn attempt(&self) {
        *self.attempts.borrow_mut() += 1;
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn attempts(&self) -> usize {
        *self.attempts.borrow()
    }
}

enum DescribeOutcome {
    Found(RemoteFunctionInfo),
    Missing,
    Broken,
}

struct MockService {
    recorder: Recorder,
    fail_delete: bool,
    fail_deploy: bool,
    describe: DescribeOutcome,
}

impl MockService {
    fn new(recorder: &Recorder) -> Self {
        Self {
            recorder: recorder.clone(),
            fail_delete: false,
            fail_deploy: false,
            describe: DescribeOutcome::Missing,
        }
    }
}

impl FunctionService for MockService {
    async fn delete_function(&self, name: &str) -> Result<(), ServiceError> {
        self.recorder.attempt();
        if self.fail_delete {
            return Err(failed("gcloud functions delete", "ERROR: PERMISSION_DENIED").into());
        }
        self.recorder.record(Call::Delete(name.to_string()));
        Ok(())
    }

    async fn deploy_function(
        &self,
        name: &str,
        environment: Environment,
        env_config: &EnvConfigRef,
        revision: Option<&str>,
    ) -> Result<(), ServiceError> {
        self.recorder.attempt();
        if self.fail_deploy {
            return Err(
                failed("gcloud functions deploy", "ERROR: Build failed: go.mod not found").into(),
            );
        }
        self.recorder.record(Call::Deploy {
            function: name.to_string(),
            environment,
            env_config: env_config.clone(),
            revision: revision.map(String::from),
        });
        Ok(())
    }

    async fn describe_function(&self, name: &str) -> Result<RemoteFunctionInfo, ServiceError> {
        self.recorder.attempt();
        match &self.describe {
            DescribeOutcome::Found(info) => {
                self.recorder.record(Call::Describe(name.to_string()));
                Ok(info.clone())
            }
            DescribeOutcome::Missing => Err(ServiceError::NotFound {
                name: name.to_string(),
                output: format!("ERROR: NOT_FOUND: Resource '{}' was not found", name),
            }),
            DescribeOutcome::Broken => {
                Err(failed("gcloud functions describe", "ERROR: UNAUTHENTICATED").into())
            }
        }
    }
}

struct MockToolchain {
    recorder: Recorder,
    fail: bool,
}

impl MockToolchain {
    fn new(recorder: &Recorder) -> Self {
        Self {
            recorder: recorder.clone(),
            fail: false,
        }
    }
}

impl BuildToolchain for MockToolchain {
    async fn build(&self, target: &str) -> Result<(), BuildError> {
        self.recorder.attempt();
        if self.fail {
            return Err(failed("go build", "./main.go:3:1: syntax error").into());
        }
        self.recorder.record(Call::Build(target.to_string()));
        Ok(())
    }
}

fn failed(command: &str, output: &str) -> CommandError {
    CommandError::Failed {
        command: command.to_string(),
        status: "exit status: 1".to_string(),
        output: output.to_string(),
    }
}

fn deploy_call(function: &str, environment: Environment, revision: Option<&str>) -> Call {
    Call::Deploy {
        function: function.to_string(),
        environment,
        env_config: EnvConfigRef::new(environment.default_env_file()),
        revision: revision.map(String::from),
    }
}

fn timestamp(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
}

// =========================================================================
// Deploy
// =========================================================================

#[tokio::test]
async fn test_scenario_a_deploy_without_clean() {
    let recorder = Recorder::default();
    let deployer = Deployer::new(MockService::new(&recorder), MockToolchain::new(&recorder));

    let request = DeploymentRequest::new("svc-a", "dev");
    deployer.deploy(&request).await.unwrap();

    assert_eq!(
        recorder.calls(),
        vec![
            Call::Build("svc-a".to_string()),
            deploy_call("svc-a", Environment::Dev, None),
        ]
    );
}

#[tokio::test]
async fn test_scenario_b_invalid_environment_makes_no_calls() {
    let recorder = Recorder::default();
    let deployer = Deployer::new(MockService::new(&recorder), MockToolchain::new(&recorder));

    let request = DeploymentRequest::new("svc-a", "prod").with_clean(true);
    let err = deployer.deploy(&request).await.unwrap_err();

    assert!(matches!(
        err,
        DeployError::InvalidEnvironment { ref environment } if environment == "prod"
    ));
    assert_eq!(err.step(), DeployStep::Validate);
    assert_eq!(recorder.attempts(), 0);
    assert!(recorder.calls().is_empty());
}

#[tokio::test]
async fn test_invalid_environments_never_reach_collaborators() {
    let recorder = Recorder::default();
    let deployer = Deployer::new(MockService::new(&recorder), MockToolchain::new(&recorder));

    for environment in ["", "Dev", "PRO", "production", "staging", " sandbox"] {
        let request = DeploymentRequest::new("svc-a", environment).with_clean(true);
        let err = deployer.deploy(&request).await.unwrap_err();
        assert!(
            matches!(err, DeployError::InvalidEnvironment { .. }),
            "{environment:?} should be rejected"
        );
    }
    assert_eq!(recorder.attempts(), 0);
}

#[tokio::test]
async fn test_scenario_c_clean_deploy_with_failing_build() {
    let recorder = Recorder::default();
    let mut toolchain = MockToolchain::new(&recorder);
    toolchain.fail = true;
    let deployer = Deployer::new(MockService::new(&recorder), toolchain);

    let request = DeploymentRequest::new("svc-a", "pro").with_clean(true);
    let err = deployer.deploy(&request).await.unwrap_err();

    assert!(matches!(err, DeployError::BuildFailed { ref function, .. } if function == "svc-a"));
    assert_eq!(err.diagnostic(), Some("./main.go:3:1: syntax error"));
    assert_eq!(recorder.calls(), vec![Call::Delete("svc-a".to_string())]);
    // delete + the failed build, never deploy
    assert_eq!(recorder.attempts(), 2);
}

#[tokio::test]
async fn test_failing_delete_skips_build_and_deploy() {
    let recorder = Recorder::default();
    let mut service = MockService::new(&recorder);
    service.fail_delete = true;
    let deployer = Deployer::new(service, MockToolchain::new(&recorder));

    let request = DeploymentRequest::new("svc-a", "sandbox").with_clean(true);
    let err = deployer.deploy(&request).await.unwrap_err();

    assert!(matches!(err, DeployError::DeleteFailed { .. }));
    assert_eq!(err.step(), DeployStep::Delete);
    assert_eq!(err.diagnostic(), Some("ERROR: PERMISSION_DENIED"));
    assert_eq!(recorder.attempts(), 1);
    assert!(recorder.calls().is_empty());
}

#[tokio::test]
async fn test_clean_deploy_runs_delete_build_deploy_in_order() {
    let recorder = Recorder::default();
    let deployer = Deployer::new(MockService::new(&recorder), MockToolchain::new(&recorder));

    let request = DeploymentRequest::new("svc-a", "pro")
        .with_clean(true)
        .with_revision("1.4.2");
    deployer.deploy(&request).await.unwrap();

    assert_eq!(
        recorder.calls(),
        vec![
            Call::Delete("svc-a".to_string()),
            Call::Build("svc-a".to_string()),
            deploy_call("svc-a", Environment::Pro, Some("1.4.2")),
        ]
    );
}

#[tokio::test]
async fn test_without_clean_never_deletes() {
    let recorder = Recorder::default();
    let deployer = Deployer::new(MockService::new(&recorder), MockToolchain::new(&recorder));

    for environment in ["sandbox", "dev", "pro"] {
        deployer
            .deploy(&DeploymentRequest::new("svc-a", environment))
            .await
            .unwrap();
    }

    let calls = recorder.calls();
    assert!(!calls.iter().any(|c| matches!(c, Call::Delete(_))));
    // every deploy is immediately preceded by its build
    for pair in calls.chunks(2) {
        assert!(matches!(pair[0], Call::Build(_)));
        assert!(matches!(pair[1], Call::Deploy { .. }));
    }
    assert_eq!(calls.len(), 6);
}

#[tokio::test]
async fn test_failing_build_never_deploys() {
    let recorder = Recorder::default();
    let mut toolchain = MockToolchain::new(&recorder);
    toolchain.fail = true;
    let deployer = Deployer::new(MockService::new(&recorder), toolchain);

    let err = deployer
        .deploy(&DeploymentRequest::new("svc-a", "dev"))
        .await
        .unwrap_err();

    assert_eq!(err.step(), DeployStep::Build);
    assert_eq!(recorder.attempts(), 1);
    assert!(recorder.calls().is_empty());
}

#[tokio::test]
async fn test_deploy_failure_surfaces_raw_output() {
    let recorder = Recorder::default();
    let mut service = MockService::new(&recorder);
    service.fail_deploy = true;
    let deployer = Deployer::new(service, MockToolchain::new(&recorder));

    let err = deployer
        .deploy(&DeploymentRequest::new("svc-a", "dev"))
        .await
        .unwrap_err();

    match &err {
        DeployError::DeployFailed {
            function,
            environment,
            ..
        } => {
            assert_eq!(function, "svc-a");
            assert_eq!(*environment, Environment::Dev);
        }
        other => panic!("expected DeployFailed, got {other:?}"),
    }
    assert_eq!(err.diagnostic(), Some("ERROR: Build failed: go.mod not found"));
    assert!(err.to_string().contains("go.mod not found"));
    assert_eq!(recorder.calls(), vec![Call::Build("svc-a".to_string())]);
}

#[tokio::test]
async fn test_empty_function_name_is_invalid_input() {
    let recorder = Recorder::default();
    let deployer = Deployer::new(MockService::new(&recorder), MockToolchain::new(&recorder));

    let err = deployer
        .deploy(&DeploymentRequest::new("", "dev").with_clean(true))
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::InvalidInput { field: "function", .. }));
    assert_eq!(recorder.attempts(), 0);
}

#[tokio::test]
async fn test_env_config_override_is_passed_through() {
    let recorder = Recorder::default();
    let deployer = Deployer::new(MockService::new(&recorder), MockToolchain::new(&recorder))
        .with_env_configs([(Environment::Pro, EnvConfigRef::new("config/pro.env.yaml"))]);

    deployer
        .deploy(&DeploymentRequest::new("svc-a", "pro").with_revision("r7"))
        .await
        .unwrap();
    deployer
        .deploy(&DeploymentRequest::new("svc-a", "dev"))
        .await
        .unwrap();

    let deploys: Vec<Call> = recorder
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Deploy { .. }))
        .collect();
    assert_eq!(
        deploys,
        vec![
            Call::Deploy {
                function: "svc-a".to_string(),
                environment: Environment::Pro,
                env_config: EnvConfigRef::new("config/pro.env.yaml"),
                revision: Some("r7".to_string()),
            },
            deploy_call("svc-a", Environment::Dev, None),
        ]
    );
}

// =========================================================================
// Describe
// =========================================================================

#[tokio::test]
async fn test_scenario_d_describe_maps_every_field() {
    let recorder = Recorder::default();
    let mut service = MockService::new(&recorder);
    service.describe = DescribeOutcome::Found(RemoteFunctionInfo {
        name: "svc-a".to_string(),
        status: FunctionLifecycle::Active,
        version: "1.0.0".to_string(),
        last_modified: timestamp("2025-04-02T10:15:30Z"),
        runtime: "go121".to_string(),
        environment: "dev".to_string(),
    });
    let fetcher = DescriptionFetcher::new(service);

    let status = fetcher.describe("svc-a").await.unwrap();

    assert_eq!(
        status,
        FunctionStatus {
            name: "svc-a".to_string(),
            status: FunctionLifecycle::Active,
            version: "1.0.0".to_string(),
            last_modified: timestamp("2025-04-02T10:15:30Z"),
            runtime: "go121".to_string(),
            environment: "dev".to_string(),
        }
    );
    assert_eq!(recorder.calls(), vec![Call::Describe("svc-a".to_string())]);
}

#[tokio::test]
async fn test_describe_empty_name_is_invalid_input() {
    let recorder = Recorder::default();
    let fetcher = DescriptionFetcher::new(MockService::new(&recorder));

    let err = fetcher.describe("").await.unwrap_err();

    assert!(matches!(err, DescribeError::InvalidInput { .. }));
    assert_eq!(recorder.attempts(), 0);
}

#[tokio::test]
async fn test_describe_missing_function_is_not_found() {
    let recorder = Recorder::default();
    let fetcher = DescriptionFetcher::new(MockService::new(&recorder));

    let err = fetcher.describe("svc-z").await.unwrap_err();

    assert!(matches!(err, DescribeError::NotFound { ref function, .. } if function == "svc-z"));
    assert_eq!(
        err.diagnostic(),
        Some("ERROR: NOT_FOUND: Resource 'svc-z' was not found")
    );
}

#[tokio::test]
async fn test_describe_query_failure_is_describe_failed() {
    let recorder = Recorder::default();
    let mut service = MockService::new(&recorder);
    service.describe = DescribeOutcome::Broken;
    let fetcher = DescriptionFetcher::new(service);

    let err = fetcher.describe("svc-a").await.unwrap_err();

    assert!(matches!(err, DescribeError::DescribeFailed { .. }));
    assert_eq!(err.diagnostic(), Some("ERROR: UNAUTHENTICATED"));
}

#[tokio::test]
async fn test_describe_reads_fresh_every_call() {
    let recorder = Recorder::default();
    let mut service = MockService::new(&recorder);
    service.describe = DescribeOutcome::Found(RemoteFunctionInfo {
        name: "svc-a".to_string(),
        status: FunctionLifecycle::DeployInProgress,
        version: "2".to_string(),
        last_modified: timestamp("2025-04-02T10:15:30Z"),
        runtime: "go121".to_string(),
        environment: "sandbox".to_string(),
    });
    let fetcher = DescriptionFetcher::new(service);

    fetcher.describe("svc-a").await.unwrap();
    fetcher.describe("svc-a").await.unwrap();

    assert_eq!(recorder.attempts(), 2);
}
