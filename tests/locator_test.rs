//! End-to-end discovery against fake installation trees.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use dotnet_locator::environment::MapEnvironment;
use dotnet_locator::platform::OsFamily;
use dotnet_locator::{Locator, LocatorError};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn isolated(env: MapEnvironment) -> Locator {
    Locator::new()
        .with_environment(Arc::new(env))
        .with_default_roots(vec![])
        .with_system_search(false)
}

fn write_executable(path: &Path, body: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }
}

fn install(root: &Path) {
    write_executable(&root.join(OsFamily::current().executable_name()), "#!/bin/sh\nexit 1\n");
    fs::create_dir_all(root.join("host/fxr/8.0.0")).unwrap();
    fs::create_dir_all(root.join("sdk/8.0.100/Sdks")).unwrap();
    fs::create_dir_all(root.join("sdk/7.0.400/Sdks")).unwrap();
}

#[tokio::test]
async fn sdk_only_installation() {
    let temp = TempDir::new().unwrap();
    install(temp.path());

    let info = isolated(MapEnvironment::new())
        .get_installation_info(Some(temp.path()), Some(temp.path()), &CancellationToken::new())
        .await
        .unwrap();

    let versions: Vec<_> = info.sdks.iter().map(|s| s.version.as_str()).collect();
    assert_eq!(versions, vec!["8.0.100", "7.0.400"]);
    assert!(info.frameworks.is_empty());
    assert_eq!(info.host.version, "8.0.0");
    assert!(info.sdks.iter().all(|s| s.path.is_absolute()));
}

#[tokio::test]
async fn explicit_root_without_executable() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("sdk/8.0.100/Sdks")).unwrap();

    let err = isolated(MapEnvironment::new())
        .get_installation_info(Some(temp.path()), Some(temp.path()), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, LocatorError::ExecutableNotFound { .. }));
}

#[tokio::test]
async fn root_from_dotnet_root_variable() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("dotnet");
    install(&root);
    fs::create_dir_all(root.join("shared/Microsoft.NETCore.App/8.0.0")).unwrap();
    fs::write(root.join("shared/Microsoft.NETCore.App/8.0.0/System.Runtime.dll"), "").unwrap();

    let env = MapEnvironment::new().with_var("DOTNET_ROOT", root.to_string_lossy());
    let info = isolated(env)
        .get_installation_info(Some(temp.path()), None, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(info.root, root);
    assert_eq!(info.frameworks.len(), 1);
    assert_eq!(info.frameworks[0].name, "Microsoft.NETCore.App");
}

#[tokio::test]
async fn root_from_default_location() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("usr/share/dotnet");
    install(&root);

    let info = Locator::new()
        .with_environment(Arc::new(MapEnvironment::new()))
        .with_default_roots(vec![temp.path().join("missing"), root.clone()])
        .with_system_search(false)
        .get_installation_info(Some(temp.path()), None, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(info.root, root);
}

#[tokio::test]
async fn pin_comes_from_probing_dir_ancestors() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("dotnet");
    install(&root);
    let project = temp.path().join("repo/src/app");
    fs::create_dir_all(&project).unwrap();
    fs::write(
        temp.path().join("repo/global.json"),
        r#"{"sdk": {"version": "7.0.400", "rollForward": "disable"}}"#,
    )
    .unwrap();

    let info = isolated(MapEnvironment::new())
        .get_installation_info(Some(&project), Some(&root), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(info.pinned_sdk_version(), Some("7.0.400"));
    assert_eq!(info.global_json_path(), Some(temp.path().join("repo/global.json").as_path()));
    assert!(info.sdk("7.0.400").is_some());
}

#[tokio::test]
async fn nothing_installed_reports_last_strategy() {
    let temp = TempDir::new().unwrap();
    let err = isolated(MapEnvironment::new())
        .get_installation_info(Some(temp.path()), None, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, LocatorError::ExecutableNotFound { .. }));
    assert!(err.to_string().contains("not found"));
}
