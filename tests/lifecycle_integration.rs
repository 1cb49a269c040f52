use site_sync::config::DeploySettings;
use site_sync::context::DeployContext;
use site_sync::contract::{
    CommandResult, Distribution, MockCloudProvider, MockCommandRunner, StackOutput,
};
use site_sync::info::{bucket_line, domain_line};
use site_sync::lifecycle::{dispatch, HookOutcome, LifecycleEvent};
use site_sync::DeployError;

fn settings() -> DeploySettings {
    DeploySettings::new("web-app", "dev", "us-east-1").with_local_path("./build")
}

fn provider_with_outputs(outputs: Vec<StackOutput>) -> MockCloudProvider {
    let mut provider = MockCloudProvider::new();
    provider
        .expect_describe_stack_outputs()
        .returning(move |_, _, _| Ok(outputs.clone()));
    provider
}

#[tokio::test]
async fn test_before_remove_empties_bucket() {
    let provider = provider_with_outputs(vec![StackOutput::new("WebAppS3BucketOutput", "my-bucket")]);
    let mut runner = MockCommandRunner::new();
    runner
        .expect_run()
        .withf(|args| args[0] == "s3" && args[1] == "rm")
        .times(1)
        .returning(|_| Ok(CommandResult::default()));

    let settings = settings();
    let ctx = DeployContext::new(&provider, &runner, &settings);
    let event: LifecycleEvent = "before:remove:remove".parse().unwrap();
    let outcome = dispatch(&ctx, event).await.unwrap();
    assert!(matches!(outcome, HookOutcome::Emptied(ref o) if o.succeeded));
}

#[tokio::test]
async fn test_sync_hook_runs_sync() {
    let provider = provider_with_outputs(vec![StackOutput::new("WebAppS3BucketOutput", "my-bucket")]);
    let mut runner = MockCommandRunner::new();
    runner
        .expect_run()
        .withf(|args| args[0] == "s3" && args[1] == "sync")
        .times(1)
        .returning(|_| Ok(CommandResult::default()));

    let settings = settings();
    let ctx = DeployContext::new(&provider, &runner, &settings);
    let outcome = dispatch(&ctx, LifecycleEvent::SyncToS3).await.unwrap();
    assert!(matches!(outcome, HookOutcome::Synced(_)));
}

#[tokio::test]
async fn test_finalize_hook_deploys() {
    let provider = {
        let mut provider = provider_with_outputs(vec![
            StackOutput::new("WebAppS3BucketOutput", "my-bucket"),
            StackOutput::new("WebAppCloudFrontDistributionOutput", "d123.cloudfront.net"),
        ]);
        provider
            .expect_list_distributions()
            .returning(|_, _| Ok(vec![Distribution::new("E1", "d123.cloudfront.net")]));
        provider
    };
    let mut runner = MockCommandRunner::new();
    runner
        .expect_run()
        .times(2)
        .returning(|_| Ok(CommandResult::default()));

    let settings = settings();
    let ctx = DeployContext::new(&provider, &runner, &settings);
    let outcome = dispatch(&ctx, "aws:deploy:finalize:cleanup".parse().unwrap())
        .await
        .unwrap();
    match outcome {
        HookOutcome::Deployed(report) => assert_eq!(report.invalidation.distribution_id, "E1"),
        other => panic!("expected Deployed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_info_hooks_degrade_to_not_found() {
    let provider = provider_with_outputs(vec![]);
    let mut runner = MockCommandRunner::new();
    runner.expect_run().never();

    let settings = settings();
    let ctx = DeployContext::new(&provider, &runner, &settings);

    let bucket = match dispatch(&ctx, LifecycleEvent::BucketInfo).await.unwrap() {
        HookOutcome::Bucket(bucket) => bucket,
        other => panic!("expected Bucket, got {other:?}"),
    };
    assert_eq!(bucket_line(bucket.as_deref()), "Web App Bucket: Not Found");

    let domain = match dispatch(&ctx, LifecycleEvent::DomainInfo).await.unwrap() {
        HookOutcome::Domain(domain) => domain,
        other => panic!("expected Domain, got {other:?}"),
    };
    assert_eq!(domain_line(domain.as_deref()), "Web App Domain: Not Found");
}

#[tokio::test]
async fn test_info_hooks_still_propagate_provider_errors() {
    let mut provider = MockCloudProvider::new();
    provider.expect_describe_stack_outputs().returning(|_, _, _| {
        Err(DeployError::Provider {
            operation: "CloudFormation.describeStacks",
            message: "throttled".to_string(),
        })
    });
    let runner = MockCommandRunner::new();

    let settings = settings();
    let ctx = DeployContext::new(&provider, &runner, &settings);
    let err = dispatch(&ctx, LifecycleEvent::BucketInfo).await.unwrap_err();
    assert!(matches!(err, DeployError::Provider { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_invalidate_hook_reports_unmatched_domain() {
    let mut provider =
        provider_with_outputs(vec![StackOutput::new("WebAppCloudFrontDistributionOutput", "dXYZ.cloudfront.net")]);
    provider.expect_list_distributions().returning(|_, _| Ok(vec![]));
    let mut runner = MockCommandRunner::new();
    runner.expect_run().never();

    let settings = settings();
    let ctx = DeployContext::new(&provider, &runner, &settings);
    let err = dispatch(&ctx, LifecycleEvent::InvalidateCache).await.unwrap_err();
    assert_eq!(err.to_string(), "Could not find distribution with domain dXYZ.cloudfront.net");
}
