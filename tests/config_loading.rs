use std::fs;
use std::path::{Path, PathBuf};

use doo::config::loader::{config_directories, config_files_in, expand_path, load_config_file};
use tempfile::tempdir;

#[test]
fn targets_inherit_the_file_defaults_cwd() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let config = dir.path().join("doo.toml");
    fs::write(
        &config,
        r#"
[defaults]
cwd = "services"

[[targets]]
name = "db"
runner = "tmux"
command = "postgres"

[[targets]]
name = "api"
command = "make run"
cwd = "api"
"#,
    )?;

    let targets = load_config_file(&config, None)?;
    assert_eq!(targets.len(), 2);
    assert_eq!(targets[0].cwd, Some(dir.path().join("services")));
    assert_eq!(targets[1].cwd, Some(dir.path().join("api")));
    Ok(())
}

#[test]
fn empty_cwd_strings_fall_back_like_omitted_keys() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let config = dir.path().join("doo.toml");
    fs::write(
        &config,
        r#"
[defaults]
cwd = "services"

[[targets]]
name = "db"
runner = "tmux"
command = "postgres"
cwd = ""
"#,
    )?;

    let targets = load_config_file(&config, None)?;
    assert_eq!(targets[0].cwd, Some(dir.path().join("services")));
    Ok(())
}

#[test]
fn empty_defaults_cwd_leaves_targets_without_one() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let config = dir.path().join("doo.toml");
    fs::write(
        &config,
        r#"
[defaults]
cwd = ""

[[targets]]
name = "build"
command = "make"
"#,
    )?;

    let targets = load_config_file(&config, None)?;
    assert_eq!(targets[0].cwd, None);
    Ok(())
}

#[test]
fn runner_defaults_to_shell() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let config = dir.path().join("doo.toml");
    fs::write(
        &config,
        r#"
[[targets]]
name = "build"
command = "make"
"#,
    )?;

    let targets = load_config_file(&config, None)?;
    assert_eq!(targets[0].runner, "shell");
    assert_eq!(targets[0].cwd, None);
    Ok(())
}

#[test]
fn unknown_keys_are_rejected() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let config = dir.path().join("doo.toml");
    fs::write(
        &config,
        r#"
[[targets]]
name = "db"
command = "x"
dependson = ["oops"]
"#,
    )?;

    assert!(load_config_file(&config, None).is_err());
    Ok(())
}

#[test]
fn tilde_paths_expand_against_the_home_directory() {
    let home = Path::new("/home/dev");
    let from = Path::new("/etc/doo");

    assert_eq!(
        expand_path("~/src/app", from, Some(home)),
        PathBuf::from("/home/dev/src/app")
    );
    assert_eq!(
        expand_path("/opt/app", from, Some(home)),
        PathBuf::from("/opt/app")
    );
    assert_eq!(
        expand_path("app", from, Some(home)),
        PathBuf::from("/etc/doo/app")
    );
}

#[test]
fn config_files_load_in_file_name_order() -> anyhow::Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("b.toml"), "")?;
    fs::write(dir.path().join("a.toml"), "")?;
    fs::write(dir.path().join("notes.txt"), "")?;

    let files = config_files_in(dir.path())?;
    assert_eq!(
        files,
        vec![dir.path().join("a.toml"), dir.path().join("b.toml")]
    );
    Ok(())
}

#[test]
fn discovery_prefers_home_then_walks_ancestors() -> anyhow::Result<()> {
    let root = tempdir()?;
    let home = root.path().join("home");
    fs::create_dir_all(home.join(".config").join("doo"))?;

    let project = root.path().join("project");
    let nested = project.join("src").join("deep");
    fs::create_dir_all(&nested)?;
    fs::create_dir_all(project.join(".doo"))?;
    fs::create_dir_all(nested.join(".doo"))?;

    let dirs = config_directories(Some(&home), &nested);

    let home_cfg = home.join(".config").join("doo");
    let nested_cfg = nested.join(".doo");
    let project_cfg = project.join(".doo");

    let pos = |p: &PathBuf| dirs.iter().position(|d| d == p);
    let home_pos = pos(&home_cfg).expect("home config dir found");
    let nested_pos = pos(&nested_cfg).expect("nested .doo found");
    let project_pos = pos(&project_cfg).expect("project .doo found");

    assert!(home_pos < nested_pos);
    assert!(nested_pos < project_pos);
    Ok(())
}
