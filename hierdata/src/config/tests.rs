use super::{BaseConfig, DEFAULT_DATADIR, SaphyrYaml};
use crate::backend::BackendKind;
use crate::HieraError;
use anyhow::{Result, anyhow, ensure};
use figment::Figment;
use figment::providers::Serialized;
use rstest::rstest;
use serde_json::{Value, json};
use test_helpers::tree::DataTree;

fn with_jail<F>(f: F) -> Result<()>
where
    F: FnOnce(&mut figment::Jail) -> Result<()>,
{
    figment::Jail::try_with(|j| f(j).map_err(|err| figment::Error::from(err.to_string())))
        .map_err(|err| anyhow!(err.to_string()))
}

fn config(value: Value) -> Result<BaseConfig> {
    BaseConfig::from_value(value).map_err(|err| anyhow!(err.to_string()))
}

#[test]
fn loads_yaml_with_symbol_keys() -> Result<()> {
    with_jail(|jail| {
        jail.create_file(
            "hiera.yaml",
            concat!(
                ":backends:\n",
                "  - yaml\n",
                "  - json\n",
                ":hierarchy:\n",
                "  - \"nodes/%{::hostname}\"\n",
                "  - common\n",
                ":yaml:\n",
                "  :datadir: data\n",
            ),
        )?;
        let base = BaseConfig::from_file("hiera.yaml")?;
        ensure!(base.backend_names()? == ["yaml", "json"]);
        let levels: Vec<String> = base.hierarchy()?.iter().map(ToString::to_string).collect();
        ensure!(levels == ["nodes/%{::hostname}", "common"]);
        ensure!(base.datadir("yaml")?.as_str() == "data");
        ensure!(base.datadir("json")?.as_str() == DEFAULT_DATADIR);
        Ok(())
    })
}

#[test]
fn base_dir_is_the_config_directory() -> Result<()> {
    let tree = DataTree::new()?;
    let path = tree.write("etc/hiera.yaml", "backends: [yaml]\nhierarchy: [common]\n")?;
    let base = BaseConfig::from_file(&path)?;
    ensure!(base.base_dir() == Some(tree.root().join("etc").as_path()));
    Ok(())
}

#[test]
fn unreadable_file_is_a_base_config_error() {
    let result = BaseConfig::from_file("/nonexistent/hiera.yaml");
    assert!(
        matches!(result, Err(HieraError::BaseConfig { ref path, .. }) if path == "/nonexistent/hiera.yaml"),
        "{result:?}"
    );
}

#[test]
fn malformed_yaml_is_a_base_config_error() -> Result<()> {
    with_jail(|jail| {
        jail.create_file("hiera.yaml", "backends: [yaml\n")?;
        let result = BaseConfig::from_file("hiera.yaml");
        ensure!(matches!(result, Err(HieraError::BaseConfig { .. })), "{result:?}");
        Ok(())
    })
}

#[rstest]
#[case(json!({}))]
#[case(json!(["backends"]))]
#[case(json!("backends: [yaml]"))]
fn rejects_empty_or_non_mapping_values(#[case] value: Value) {
    let result = BaseConfig::from_value(value);
    assert!(matches!(result, Err(HieraError::Configuration { .. })), "{result:?}");
}

#[rstest]
#[case(json!({"hierarchy": ["common"]}))]
#[case(json!({"backends": [], "hierarchy": ["common"]}))]
fn missing_backends(#[case] value: Value) -> Result<()> {
    let result = config(value)?.backend_names();
    ensure!(matches!(result, Err(HieraError::NoBackends)), "{result:?}");
    Ok(())
}

#[test]
fn backend_names_drop_repeats() -> Result<()> {
    let base = config(json!({"backends": ["json", "yaml", "json"], "hierarchy": []}))?;
    ensure!(base.backend_names()? == ["json", "yaml"]);
    Ok(())
}

#[test]
fn single_string_lists_are_accepted() -> Result<()> {
    let base = config(json!({"backends": "yaml", ":hierarchy": "common"}))?;
    ensure!(base.backend_names()? == ["yaml"]);
    ensure!(base.hierarchy()?.len() == 1);
    Ok(())
}

#[test]
fn missing_hierarchy() -> Result<()> {
    let result = config(json!({"backends": ["yaml"]}))?.hierarchy();
    ensure!(matches!(result, Err(HieraError::MissingHierarchy)), "{result:?}");
    Ok(())
}

#[rstest]
#[case(json!({"backends": ["yaml"], "hierarchy": [1]}))]
#[case(json!({"backends": ["yaml"], "hierarchy": {"common": true}}))]
fn malformed_hierarchy(#[case] value: Value) -> Result<()> {
    let result = config(value)?.hierarchy();
    ensure!(matches!(result, Err(HieraError::Configuration { .. })), "{result:?}");
    Ok(())
}

#[rstest]
#[case(json!({"yaml": {"datadir": 3}}))]
#[case(json!({"yaml": ["data"]}))]
fn malformed_datadir(#[case] value: Value) -> Result<()> {
    let result = config(value)?.datadir("yaml");
    ensure!(matches!(result, Err(HieraError::Configuration { .. })), "{result:?}");
    Ok(())
}

#[test]
fn plain_keys_win_over_symbol_keys() -> Result<()> {
    let base = config(json!({
        "backends": ["yaml"],
        ":backends": ["json"],
        "yaml": {"datadir": "plain", ":datadir": "symbol"},
    }))?;
    ensure!(base.backend_names()? == ["yaml"]);
    ensure!(base.datadir("yaml")?.as_str() == "plain");
    Ok(())
}

#[test]
fn registry_follows_declared_order() -> Result<()> {
    let base = config(json!({
        "backends": ["json", "yaml"],
        "hierarchy": ["common"],
        "json": {"datadir": "json-data"},
    }))?;
    let registry = base.registry(BackendKind::ALL)?;
    let names: Vec<_> = registry.iter().map(|backend| backend.name()).collect();
    ensure!(names == ["json", "yaml"]);
    ensure!(registry.get("json").map(|b| b.datadir().as_str()) == Some("json-data"));
    Ok(())
}

#[rstest]
#[case(&["yaml", "toml"], BackendKind::ALL, "toml")]
#[case(&["yaml", "json"], &[BackendKind::Yaml], "json")]
fn unknown_backends(
    #[case] backends: &[&str],
    #[case] available: &[BackendKind],
    #[case] expected: &str,
) -> Result<()> {
    let base = config(json!({"backends": backends, "hierarchy": ["common"]}))?;
    let result = base.registry(available);
    ensure!(
        matches!(result, Err(HieraError::UnknownBackend { ref name }) if name == expected),
        "{result:?}"
    );
    Ok(())
}

#[test]
fn composes_with_other_providers() -> Result<()> {
    let figment = Figment::from(SaphyrYaml::string(
        "hiera.yaml",
        "backends: [yaml]\nhierarchy: [common]\n",
    ))
    .merge(Serialized::default("hierarchy", ["override", "common"]));
    let base = BaseConfig::from_figment(&figment)?;
    ensure!(base.hierarchy()?.len() == 2);
    ensure!(base.base_dir().is_none());
    Ok(())
}
