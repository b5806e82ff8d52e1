//! The resolution engine.
//!
//! Two sequential passes build the overlay. The parameter-store pass
//! flattens fetched parameter objects back into the parameter-store
//! namespace, only overwriting keys whose suffix names a field of the
//! fetched object. The region for the secrets-manager pass is then read
//! from the resolved values, and the secrets-manager pass flattens each
//! secret under its pointer-derived prefix, inserting `null` for fields
//! the secret does not carry. Secrets-manager entries win the final merge.
//!
//! Pointer entries are iterated in lexical key order and each distinct
//! name is fetched exactly once, so the overlay is deterministic no matter
//! how many pointers reference the same payload.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;
use tracing::{debug, info};

use crate::classify::{Classification, classify};
use crate::config::ConfigSources;
use crate::constants::{
    PARAMETER_STORE_PREFIX, PARAMETER_STORE_REGION, SECRETS_MANAGER_PREFIX,
    SECRETS_MANAGER_SECRET_NAME_PREFIX,
};
use crate::error::{ResolveError, Result};
use crate::fetch::{SecretBlob, SecretFetcher};

/// Runs the full resolution pass against `sources` and publishes the
/// result as the highest-priority source.
///
/// No-op when `aws.parameterstore.config.enabled` is not the exact string
/// `true`. Any fetch or parse failure aborts before anything is published,
/// leaving `sources` untouched.
pub async fn post_process<F>(sources: &mut ConfigSources, fetcher: &F) -> Result<()>
where
    F: SecretFetcher + ?Sized,
{
    let classified = classify(sources);
    if !classified.enabled {
        debug!("aws config resolution disabled, leaving configuration untouched");
        return Ok(());
    }

    info!(
        parameter_store_keys = classified.parameter_store_props.len(),
        secret_manager_keys = classified.secret_manager_props.len(),
        "starting aws config resolution"
    );
    let overlay = resolve(&classified, fetcher).await?;
    info!(resolved_keys = overlay.len(), "aws config resolution complete");
    sources.publish(overlay);
    Ok(())
}

/// Resolves the classified key space into an overlay map without mutating
/// any source. Callers normally go through [`post_process`].
pub async fn resolve<F>(
    classified: &Classification,
    fetcher: &F,
) -> Result<BTreeMap<String, Value>>
where
    F: SecretFetcher + ?Sized,
{
    let mut resolved = resolve_parameter_store(classified, fetcher).await?;
    let region = region_of(&resolved)?;
    let working = apply_name_overrides(classified, &resolved);
    let from_secrets = resolve_secrets_manager(&working, &region, fetcher).await?;
    // secrets-manager entries win on conflict
    resolved.extend(from_secrets);
    Ok(resolved)
}

/// Parameter-store pass: fetch each pointed-to parameter and flatten its
/// fields onto the parameter-store-namespaced keys whose suffix matches.
/// Keys without a matching field keep their original value.
async fn resolve_parameter_store<F>(
    classified: &Classification,
    fetcher: &F,
) -> Result<BTreeMap<String, Value>>
where
    F: SecretFetcher + ?Sized,
{
    let mut resolved = BTreeMap::new();
    let mut fetched: HashMap<String, SecretBlob> = HashMap::new();

    for (pointer_key, pointer_value) in &classified.parameter_store_pointers {
        let name = value_text(pointer_value);
        if !fetched.contains_key(&name) {
            let blob = fetcher.fetch_parameter(&name).await?;
            fetched.insert(name.clone(), blob);
        }
        let blob = &fetched[&name];

        for key in classified.parameter_store_props.keys() {
            let Some(suffix) = key.strip_prefix(PARAMETER_STORE_PREFIX) else {
                continue;
            };
            if blob.contains_key(suffix) {
                debug!(key = %key, pointer = %pointer_key, "overwriting property from parameter store");
                resolved.insert(key.clone(), Value::String(value_text(&blob[suffix])));
            }
        }
    }

    Ok(resolved)
}

/// Reads the region for secrets-manager calls out of the parameter-store
/// pass result.
fn region_of(resolved: &BTreeMap<String, Value>) -> Result<String> {
    resolved
        .get(PARAMETER_STORE_REGION)
        .map(value_text)
        .ok_or_else(|| ResolveError::MissingConfiguration(PARAMETER_STORE_REGION.to_string()))
}

/// Lets a parameter-store-resolved value override a secret pointer before
/// the secrets-manager pass runs.
///
/// The override reads the pointer key itself back out of the resolved map,
/// which the parameter-store pass never populates under the secrets-manager
/// namespace, so the branch does not fire in practice. Kept compatible with
/// the behavior existing deployments see; pinned by a regression test.
fn apply_name_overrides(
    classified: &Classification,
    resolved: &BTreeMap<String, Value>,
) -> BTreeMap<String, Value> {
    let mut working = classified.secret_manager_props.clone();

    for pointer_key in classified.secret_manager_pointers.keys() {
        let Some(suffix) = pointer_key.strip_prefix(SECRETS_MANAGER_SECRET_NAME_PREFIX) else {
            continue;
        };
        let derived = format!("{PARAMETER_STORE_PREFIX}{suffix}");
        if resolved.contains_key(&derived) {
            if let Some(value) = resolved.get(pointer_key.as_str()) {
                working.insert(pointer_key.clone(), value.clone());
            }
        }
    }

    working
}

/// Secrets-manager pass: fetch each pointed-to secret and flatten its
/// fields onto the keys sharing the pointer-derived prefix. A key whose
/// field is absent from the secret is still inserted, with a `null` value.
async fn resolve_secrets_manager<F>(
    working: &BTreeMap<String, Value>,
    region: &str,
    fetcher: &F,
) -> Result<BTreeMap<String, Value>>
where
    F: SecretFetcher + ?Sized,
{
    let mut resolved = BTreeMap::new();
    let mut fetched: HashMap<String, SecretBlob> = HashMap::new();

    for (pointer_key, pointer_value) in working {
        let Some(pointer_suffix) = pointer_key.strip_prefix(SECRETS_MANAGER_SECRET_NAME_PREFIX)
        else {
            continue;
        };
        let name = value_text(pointer_value);
        if !fetched.contains_key(&name) {
            let blob = fetcher.fetch_secret(&name, region).await?;
            fetched.insert(name.clone(), blob);
        }
        let blob = &fetched[&name];

        let prefix = format!("{SECRETS_MANAGER_PREFIX}{pointer_suffix}");
        for key in working.keys() {
            if !key.starts_with(&prefix) {
                continue;
            }
            // field name: the prefix plus one separator character stripped
            let Some(field) = key.get(prefix.len() + 1..) else {
                continue;
            };
            debug!(key = %key, pointer = %pointer_key, "overwriting property from secrets manager");
            let value = blob
                .get(field)
                .map(|f| Value::String(value_text(f)))
                .unwrap_or(Value::Null);
            resolved.insert(key.clone(), value);
        }
    }

    Ok(resolved)
}

/// Renders a configuration value the way a flat properties file would show
/// it: strings verbatim, everything else as its JSON text.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
