use site_sync::context::DeployContext;
use site_sync::config::DeploySettings;
use site_sync::contract::{CloudProvider, CommandResult, Distribution, MockCommandRunner, StackOutput};
use site_sync::info::{bucket_info, domain_info};
use site_sync::provider::AwsCliProvider;
use site_sync::resolve::{require_output, resolve_output};
use site_sync::DeployError;

const DESCRIBE_STACKS: &str = r#"{
    "Stacks": [
        {
            "StackName": "web-app-dev",
            "StackStatus": "UPDATE_COMPLETE",
            "Outputs": [
                { "OutputKey": "WebAppCloudFrontDistributionOutput", "OutputValue": "d123.cloudfront.net" },
                { "OutputKey": "WebAppS3BucketOutput", "OutputValue": "my-bucket", "Description": "bucket" }
            ]
        }
    ]
}"#;

const LIST_DISTRIBUTIONS: &str = r#"{
    "DistributionList": {
        "Quantity": 2,
        "Items": [
            { "Id": "E1", "DomainName": "d123.cloudfront.net", "Status": "Deployed" },
            { "Id": "E2", "DomainName": "d456.cloudfront.net", "Status": "Deployed" }
        ]
    }
}"#;

fn runner_returning(stdout: &'static str, stderr: &'static str, code: i32) -> MockCommandRunner {
    let mut runner = MockCommandRunner::new();
    runner
        .expect_run()
        .returning(move |_| Ok(CommandResult::new(stdout, stderr, Some(code))));
    runner
}

#[tokio::test]
async fn test_describe_stacks_decodes_outputs() {
    let mut runner = MockCommandRunner::new();
    runner
        .expect_run()
        .withf(|args| {
            args.iter().map(String::as_str).eq([
                "cloudformation",
                "describe-stacks",
                "--stack-name",
                "web-app-dev",
                "--region",
                "eu-west-1",
                "--output",
                "json",
            ])
        })
        .times(1)
        .returning(|_| Ok(CommandResult::new(DESCRIBE_STACKS, "", Some(0))));

    let provider = AwsCliProvider::new(runner);
    let outputs = provider
        .describe_stack_outputs("web-app-dev", "dev", "eu-west-1")
        .await
        .expect("outputs should decode");
    assert_eq!(
        outputs,
        vec![
            StackOutput::new("WebAppCloudFrontDistributionOutput", "d123.cloudfront.net"),
            StackOutput::new("WebAppS3BucketOutput", "my-bucket"),
        ]
    );
}

#[tokio::test]
async fn test_stack_without_outputs_is_empty() {
    let provider = AwsCliProvider::new(runner_returning(r#"{"Stacks":[{"StackName":"s"}]}"#, "", 0));
    let outputs = provider
        .describe_stack_outputs("s", "dev", "us-east-1")
        .await
        .expect("missing Outputs means no outputs");
    assert!(outputs.is_empty());
}

#[tokio::test]
async fn test_missing_stack_is_stack_not_found() {
    let provider = AwsCliProvider::new(runner_returning(
        "",
        "An error occurred (ValidationError) when calling the DescribeStacks operation: Stack with id web-app-dev does not exist",
        254,
    ));
    let err = provider
        .describe_stack_outputs("web-app-dev", "dev", "us-east-1")
        .await
        .unwrap_err();
    assert!(
        matches!(&err, DeployError::StackNotFound { stack_name } if stack_name == "web-app-dev"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_other_provider_failures_are_provider_errors() {
    let provider = AwsCliProvider::new(runner_returning("", "Unable to locate credentials", 253));
    let err = provider.list_distributions("dev", "us-east-1").await.unwrap_err();
    assert!(matches!(err, DeployError::Provider { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_garbage_output_is_a_decode_error() {
    let provider = AwsCliProvider::new(runner_returning("not json", "", 0));
    let err = provider.list_distributions("dev", "us-east-1").await.unwrap_err();
    assert!(matches!(err, DeployError::Decode { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_list_distributions_reads_single_page() {
    let mut runner = MockCommandRunner::new();
    runner
        .expect_run()
        .withf(|args| args.iter().any(|a| a == "--no-paginate") && args[1] == "list-distributions")
        .times(1)
        .returning(|_| Ok(CommandResult::new(LIST_DISTRIBUTIONS, "", Some(0))));
    let provider = AwsCliProvider::new(runner);
    let distributions = provider.list_distributions("dev", "us-east-1").await.unwrap();
    assert_eq!(
        distributions,
        vec![
            Distribution::new("E1", "d123.cloudfront.net"),
            Distribution::new("E2", "d456.cloudfront.net"),
        ]
    );
}

#[tokio::test]
async fn test_account_without_distributions() {
    let provider = AwsCliProvider::new(runner_returning(r#"{"DistributionList":{"Quantity":0}}"#, "", 0));
    let distributions = provider.list_distributions("dev", "us-east-1").await.unwrap();
    assert!(distributions.is_empty());
}

#[tokio::test]
async fn test_resolution_through_the_cli_provider() {
    let provider = AwsCliProvider::new(runner_returning(DESCRIBE_STACKS, "", 0));
    let runner = MockCommandRunner::new();
    let settings = DeploySettings::new("web-app", "dev", "us-east-1");
    let ctx = DeployContext::new(&provider, &runner, &settings);

    assert_eq!(
        resolve_output(&ctx, "WebAppS3BucketOutput").await.unwrap().as_deref(),
        Some("my-bucket")
    );
    assert_eq!(resolve_output(&ctx, "NoSuchOutput").await.unwrap(), None);
    assert!(matches!(
        require_output(&ctx, "NoSuchOutput").await,
        Err(DeployError::MissingOutput { .. })
    ));
    assert_eq!(bucket_info(&ctx).await.unwrap().as_deref(), Some("my-bucket"));
    assert_eq!(
        domain_info(&ctx).await.unwrap().as_deref(),
        Some("d123.cloudfront.net")
    );
}
