use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_ec2::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_ec2::operation::describe_instances::DescribeInstancesError;
use aws_sdk_ec2::types::{Filter, Instance};
use aws_sdk_ec2::Client as Ec2Client;
use aws_types::region::Region;
use log::{debug, info};

use crate::error::Error;
use crate::matching::exact_tag_match;
use crate::tags::TagSet;
use crate::{Query, Selection, Skipped, Target};

/// List running EC2 instances in the query's region and keep the ones
/// whose tag set equals the query tags exactly.
pub async fn select(query: &Query) -> Result<Selection, Error> {
    let config = sdk_config(&query.region).await;
    let client = Ec2Client::new(&config);

    let resp = client
        .describe_instances()
        .filters(
            Filter::builder()
                .name("instance-state-name")
                .values("running")
                .build(),
        )
        .send()
        .await
        .map_err(classify_error)?;

    let instances: Vec<Instance> = resp
        .reservations()
        .iter()
        .flat_map(|res| res.instances())
        .cloned()
        .collect();
    info!(
        "ec2 returned {} running instances in {}",
        instances.len(),
        query.region
    );

    Ok(filter_instances(
        &instances,
        &query.tags,
        query.role(),
        query.use_private,
    ))
}

async fn sdk_config(region: &str) -> aws_types::SdkConfig {
    let region_provider =
        RegionProviderChain::first_try(Region::new(region.to_string())).or_default_provider();

    aws_config::defaults(BehaviorVersion::v2024_03_28())
        .region(region_provider)
        .load()
        .await
}

fn classify_error(err: SdkError<DescribeInstancesError>) -> Error {
    let auth_code = matches!(
        err.as_service_error().and_then(ProvideErrorMetadata::code),
        Some("AuthFailure")
            | Some("UnauthorizedOperation")
            | Some("InvalidClientTokenId")
            | Some("SignatureDoesNotMatch")
            | Some("RequestExpired")
    );
    let message = DisplayErrorContext(&err).to_string();
    if auth_code {
        Error::Auth(message)
    } else {
        Error::Network(message)
    }
}

fn filter_instances(
    instances: &[Instance],
    query_tags: &TagSet,
    role: &str,
    use_private: bool,
) -> Selection {
    let mut selection = Selection::default();

    for instance in instances {
        let id = instance.instance_id().unwrap_or("<unknown>");
        let tags = tag_map(instance);
        if !exact_tag_match(&tags, query_tags) {
            debug!("{} tags {:?} do not match", id, tags);
            continue;
        }
        match pick_address(instance, use_private) {
            Some(address) => selection.targets.push(Target {
                address: address.to_string(),
                role: role.to_string(),
            }),
            None => selection.skipped.push(Skipped {
                server: id.to_string(),
                reason: if use_private {
                    "matched but has no private address".to_string()
                } else {
                    "matched but has no public address".to_string()
                },
            }),
        }
    }

    selection
}

/// An EC2 tag without a value is treated as an empty-string value, the
/// same shape `parse_tags` produces for `"key:"`.
fn tag_map(instance: &Instance) -> TagSet {
    instance
        .tags()
        .iter()
        .filter_map(|tag| {
            let key = tag.key()?.to_string();
            Some((key, tag.value().unwrap_or_default().to_string()))
        })
        .collect()
}

fn pick_address(instance: &Instance, use_private: bool) -> Option<&str> {
    if use_private {
        instance.private_ip_address()
    } else {
        instance.public_ip_address()
    }
}
