use super::Hiera;
use crate::backend::BackendKind;
use crate::{BaseConfig, Context, HieraError, LookupOptions};
use anyhow::{Result, ensure};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use test_helpers::tree::DataTree;

#[fixture]
fn tree() -> DataTree {
    match DataTree::new() {
        Ok(tree) => tree,
        Err(err) => panic!("create data tree: {err}"),
    }
}

fn base(value: Value) -> Result<BaseConfig> {
    Ok(BaseConfig::from_value(value)?)
}

#[rstest]
#[case(json!({"hierarchy": ["common"]}), "no backends")]
#[case(json!({"backends": ["xml"], "hierarchy": ["common"]}), "invalid backend")]
#[case(json!({"backends": ["yaml"]}), "missing hierarchy")]
fn invalid_configurations_fail_to_build(
    #[case] config: Value,
    #[case] expected: &str,
) -> Result<()> {
    let result = Hiera::builder(base(config)?).build();
    let message = result.err().map(|err| err.to_string()).unwrap_or_default();
    ensure!(message.contains(expected), "unexpected error: {message}");
    Ok(())
}

#[rstest]
fn backends_are_restricted_to_the_available_kinds(tree: DataTree) -> Result<()> {
    let config = base(tree.base_config(&["yaml", "json"], &["common"]))?;
    let result = Hiera::builder(config)
        .backends(&[BackendKind::Yaml])
        .build();
    ensure!(
        matches!(result, Err(HieraError::UnknownBackend { ref name }) if name == "json"),
        "{result:?}"
    );
    Ok(())
}

#[rstest]
fn preload_reports_broken_files(tree: DataTree) -> Result<()> {
    tree.write("common.yaml", "key: [unclosed\n")?;
    let config = base(tree.base_config(&["yaml"], &["common"]))?;
    let result = Hiera::builder(config).build();
    ensure!(matches!(result, Err(HieraError::Load { .. })), "{result:?}");
    Ok(())
}

#[rstest]
fn preload_can_be_disabled(tree: DataTree) -> Result<()> {
    tree.write("common.yaml", "key: [unclosed\n")?;
    let config = base(tree.base_config(&["yaml"], &["common"]))?;
    let hiera = Hiera::builder(config).preload(false).build()?;
    ensure!(hiera.cache().is_empty());
    let result = hiera.get("key", &LookupOptions::new().with_default(1));
    ensure!(matches!(result, Err(HieraError::Load { .. })), "{result:?}");
    Ok(())
}

#[rstest]
fn preload_uses_the_default_context(tree: DataTree) -> Result<()> {
    tree.write("common.yaml", "a: 1\n")?;
    tree.write("nodes/web01.yaml", "a: 2\n")?;
    tree.write("nodes/web02.yaml", "a: 3\n")?;
    let config = base(tree.base_config(&["yaml"], &["nodes/%{hostname}", "common"]))?;
    let hiera = Hiera::builder(config).var("hostname", "web01").build()?;
    ensure!(hiera.cache().len() == 2, "expected web01 and common only");
    ensure!(hiera.cache().get(&tree.root().join("nodes/web02.yaml")).is_none());
    Ok(())
}

#[rstest]
fn relative_datadirs_resolve_against_the_base_path(tree: DataTree) -> Result<()> {
    tree.write("data/common.json", r#"{"answer": 42}"#)?;
    let config = base(json!({
        "backends": ["json"],
        "hierarchy": ["common"],
        "json": {"datadir": "data"},
    }))?;
    let hiera = Hiera::builder(config).base_path(tree.root()).build()?;
    ensure!(hiera.base_path() == tree.root());
    ensure!(hiera.extract::<u32>("answer", &LookupOptions::new())? == 42);
    Ok(())
}

#[rstest]
fn base_path_defaults_to_the_config_directory(tree: DataTree) -> Result<()> {
    tree.write("etc/data/common.yaml", "answer: 42\n")?;
    let path = tree.write(
        "etc/hiera.yaml",
        "backends: [yaml]\nhierarchy: [common]\nyaml:\n  datadir: data\n",
    )?;
    let hiera = Hiera::from_file(&path)?;
    ensure!(hiera.base_path() == tree.root().join("etc").as_path());
    ensure!(hiera.get("answer", &LookupOptions::new())? == Some(json!(42)));
    Ok(())
}

#[rstest]
fn load_directory_fills_the_cache(tree: DataTree) -> Result<()> {
    tree.write("extra/b.yaml", "b: 1\n")?;
    tree.write("extra/a.json", r#"{"a": 1}"#)?;
    tree.write("extra/notes.txt", "ignored")?;
    let config = base(tree.base_config(&["yaml", "json"], &["common"]))?;
    let hiera = Hiera::builder(config).build()?;

    let all = hiera.load_directory(tree.root().join("extra"), None)?;
    let names: Vec<_> = all.iter().filter_map(|path| path.file_name()).collect();
    ensure!(names == ["a.json", "b.yaml"], "{names:?}");
    ensure!(hiera.cache().len() == 2);

    let yaml_only = hiera.load_directory("extra", Some("yaml"));
    ensure!(yaml_only.is_ok(), "relative directories resolve against the base path");

    let unknown = hiera.load_directory("extra", Some("toml"));
    ensure!(matches!(unknown, Err(HieraError::UnknownBackend { .. })), "{unknown:?}");
    Ok(())
}

#[rstest]
fn scoped_views_do_not_change_the_engine(tree: DataTree) -> Result<()> {
    tree.write("roles/db.yaml", "port: 5432\n")?;
    let config = base(tree.base_config(&["yaml"], &["roles/%{role}"]))?;
    let hiera = Hiera::builder(config).var("role", "web").build()?;
    let db = hiera.scoped(Context::new().with("role", "db"));

    ensure!(db.get("port", &LookupOptions::new())? == Some(json!(5432)));
    ensure!(db.has("port", &LookupOptions::new())?);
    ensure!(!db.has("port", &LookupOptions::new().with_var("role", "web"))?);
    ensure!(!hiera.has("port", &LookupOptions::new())?);
    ensure!(hiera.context().get("role") == Some(&json!("web")));
    ensure!(db.bound_context().get("role") == Some(&json!("db")));
    Ok(())
}

#[test]
fn engine_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Hiera>();
}
