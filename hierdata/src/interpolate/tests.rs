use super::{KeyLookup, resolve};
use crate::{Context, HieraError, HieraResult};
use anyhow::{Result, ensure};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

/// Flat key store that resolves references recursively.
struct Store {
    context: Context,
    data: Value,
    lookups: Vec<String>,
}

impl KeyLookup for Store {
    fn context(&self) -> &Context {
        &self.context
    }

    fn lookup_key(&mut self, key: &str) -> HieraResult<Value> {
        self.lookups.push(key.to_owned());
        let raw = self
            .data
            .get(key)
            .cloned()
            .ok_or_else(|| HieraError::not_found(key))?;
        resolve(&raw, self)
    }
}

#[fixture]
fn store() -> Store {
    Store {
        context: Context::new()
            .with("environment", "production")
            .with("replicas", 3)
            .with("tags", json!(["a"])),
        data: json!({
            "db.host": "db.internal",
            "db.port": 5432,
            "servers": ["a", "b"],
            "nested": "%{hiera('db.host')}",
            "empty": "",
        }),
        lookups: Vec::new(),
    }
}

#[rstest]
#[case(json!("plain"), json!("plain"))]
#[case(json!(7), json!(7))]
#[case(json!("env=%{environment}"), json!("env=production"))]
#[case(json!("env=%{::environment}"), json!("env=production"))]
#[case(json!("x=%{unset}!"), json!("x=!"))]
#[case(json!("n=%{replicas}"), json!("n=3"))]
#[case(json!("%{scope('environment')}"), json!("production"))]
#[case(json!("%{scope('replicas')}"), json!(3))]
#[case(json!("host=%{hiera('db.host')}"), json!("host=db.internal"))]
#[case(json!("%{lookup('db.port')}"), json!(5432))]
#[case(json!("via %{hiera('nested')}"), json!("via db.internal"))]
#[case(json!("%{alias('servers')}"), json!(["a", "b"]))]
#[case(json!("%{literal('%{environment}')}"), json!("%{environment}"))]
#[case(json!("100%{literal('%')}"), json!("100%"))]
#[case(
    json!({"url": "%{hiera('db.host')}:%{environment}", "list": ["%{environment}", 1]}),
    json!({"url": "db.internal:production", "list": ["production", 1]}),
)]
fn resolves_markup(mut store: Store, #[case] raw: Value, #[case] expected: Value) -> Result<()> {
    let resolved = resolve(&raw, &mut store)?;
    ensure!(resolved == expected, "got {resolved}, expected {expected}");
    Ok(())
}

#[rstest]
#[case("x-%{alias('servers')}")]
#[case("%{alias('servers')}%{alias('servers')}")]
#[case("port %{lookup('db.port')}")]
#[case("%{scope('unset')}")]
#[case("%{hiera('empty')}")]
#[case("tags=%{tags}")]
fn rejects_markup(mut store: Store, #[case] raw: &str) {
    let result = resolve(&json!(raw), &mut store);
    assert!(
        matches!(result, Err(HieraError::Interpolation { ref value, .. }) if value == raw),
        "{result:?}"
    );
}

#[rstest]
#[case("%{alias('missing')}", "alias")]
#[case("%{hiera('missing')}", "hiera")]
#[case("a %{lookup('missing')}", "lookup")]
fn missing_references_name_the_function(
    mut store: Store,
    #[case] raw: &str,
    #[case] expected: &str,
) {
    let result = resolve(&json!(raw), &mut store);
    assert!(
        matches!(
            result,
            Err(HieraError::ReferenceNotFound { ref function, ref key })
                if function == expected && key == "missing"
        ),
        "{result:?}"
    );
}

#[rstest]
fn literal_bypasses_lookup(mut store: Store) -> Result<()> {
    let resolved = resolve(&json!("%{literal('db.host')}"), &mut store)?;
    ensure!(resolved == json!("db.host"));
    ensure!(store.lookups.is_empty(), "literal must not look anything up");
    Ok(())
}

#[rstest]
fn unknown_function_is_a_variable(mut store: Store) -> Result<()> {
    let resolved = resolve(&json!("[%{upper('x')}]"), &mut store)?;
    ensure!(resolved == json!("[]"));
    Ok(())
}
