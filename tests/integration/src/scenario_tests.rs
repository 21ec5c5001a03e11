//! Scenario tests across the whole stack
//!
//! Each test builds a workspace on disk, loads its configuration the way the
//! CLI does, and drives the engine through a sequence of file events.

use csproj_core::{FileEvent, SyncAction, SyncConfig, SyncEngine, SyncOptions};
use csproj_document::ManifestDocument;
use csproj_test_utils::TestWorkspace;
use pretty_assertions::assert_eq;

const UNITY_MANIFEST: &str = include_str!("../../../test-fixtures/manifests/Assembly-CSharp.csproj");

fn engine_for(ws: &TestWorkspace, dry_run: bool) -> SyncEngine {
    let config = SyncConfig::load(ws.root()).unwrap();
    let engine = SyncEngine::new(ws.root(), config, SyncOptions { dry_run });
    engine.start();
    engine
}

// =============================================================================
// Editing a real generated manifest
// =============================================================================

#[test]
fn session_on_generated_manifest_preserves_everything_else() {
    let ws = TestWorkspace::new();
    ws.manifest_with("Assembly-CSharp", UNITY_MANIFEST);
    let engine = engine_for(&ws, false);

    let boss = ws.source("Assets/Scripts/Boss.cs");
    engine.handle(&FileEvent::created(&boss)).unwrap();
    engine
        .handle(&FileEvent::renamed(&boss, ws.path("Assets/Scripts/Bosses/Dragon.cs")))
        .unwrap();
    engine
        .handle(&FileEvent::deleted(ws.path("Assets/Scripts/Enemy.cs")))
        .unwrap();

    let text = ws.read_manifest("Assembly-CSharp");
    let doc = ManifestDocument::parse(&text).unwrap();
    assert_eq!(
        doc.compile_entries(),
        vec![
            r"Assets\Scripts\Player.cs",
            r"Assets\Scripts\UI\HealthBar.cs",
            r"Assets\Scripts\Bosses\Dragon.cs",
        ]
    );

    // Everything outside the compile group is untouched
    let untouched = |s: &str| s.split("  <ItemGroup>\n    <Compile").next().unwrap().to_string();
    assert_eq!(untouched(&text), untouched(UNITY_MANIFEST));
    assert!(text.ends_with(
        "  <Import Project=\"$(MSBuildToolsPath)\\Microsoft.CSharp.targets\" />\n  <Target Name=\"GenerateTargetFrameworkMonikerAttribute\" />\n</Project>\n"
    ));
}

#[test]
fn create_then_delete_restores_generated_manifest_bytes() {
    let ws = TestWorkspace::new();
    ws.manifest_with("Assembly-CSharp", UNITY_MANIFEST);
    let engine = engine_for(&ws, false);
    let file = ws.source("Assets/Scripts/Temporary.cs");

    engine.handle(&FileEvent::created(&file)).unwrap();
    engine.handle(&FileEvent::deleted(&file)).unwrap();

    assert_eq!(ws.read_manifest("Assembly-CSharp"), UNITY_MANIFEST);
}

// =============================================================================
// Multi-assembly workspaces
// =============================================================================

#[test]
fn files_follow_their_assemblies_through_a_refactor() {
    let ws = TestWorkspace::new();
    ws.manifest("Assembly-CSharp");
    ws.manifest("Assembly-CSharp-Editor");
    ws.manifest("Game.Core");
    ws.manifest("Game.Core.Editor");
    ws.marker("Assets/Core", "Game.Core");
    ws.marker("Assets/Core/Editor", "Game.Core.Editor");
    let engine = engine_for(&ws, false);

    let loose = ws.source("Assets/Health.cs");
    let inspector = ws.source("Assets/Editor/HealthInspector.cs");
    engine.handle(&FileEvent::created(&loose)).unwrap();
    engine.handle(&FileEvent::created(&inspector)).unwrap();
    ws.assert_registered("Assembly-CSharp", r"Assets\Health.cs");
    ws.assert_registered("Assembly-CSharp-Editor", r"Assets\Editor\HealthInspector.cs");

    // Move both into the Core assembly
    let report = engine
        .handle(&FileEvent::renamed(&loose, ws.path("Assets/Core/Health.cs")))
        .unwrap();
    assert!(report.success);
    let report = engine
        .handle(&FileEvent::renamed(
            &inspector,
            ws.path("Assets/Core/Editor/HealthInspector.cs"),
        ))
        .unwrap();
    assert!(report.success);

    ws.assert_not_registered("Assembly-CSharp", r"Assets\Health.cs");
    ws.assert_not_registered("Assembly-CSharp-Editor", r"Assets\Editor\HealthInspector.cs");
    ws.assert_registered("Game.Core", r"Assets\Core\Health.cs");
    ws.assert_registered("Game.Core.Editor", r"Assets\Core\Editor\HealthInspector.cs");
}

#[test]
fn marker_added_later_redirects_new_files() {
    let ws = TestWorkspace::new();
    ws.manifest("Assembly-CSharp");
    ws.manifest("Game.Audio");
    let engine = engine_for(&ws, false);

    let first = ws.source("Assets/Audio/Mixer.cs");
    engine.handle(&FileEvent::created(&first)).unwrap();
    ws.assert_registered("Assembly-CSharp", r"Assets\Audio\Mixer.cs");

    ws.marker("Assets/Audio", "Game.Audio");
    let second = ws.source("Assets/Audio/Voice.cs");
    engine.handle(&FileEvent::created(&second)).unwrap();
    ws.assert_registered("Game.Audio", r"Assets\Audio\Voice.cs");
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn workspace_config_changes_conventions() {
    let ws = TestWorkspace::new();
    ws.file(
        "csproj-sync.toml",
        "editor_directory = \"EditorOnly\"\neditor_scope = \"Tools\"\npath_style = \"slash\"\n",
    );
    ws.manifest("Assembly-CSharp");
    ws.manifest("Tools");
    let engine = engine_for(&ws, false);

    engine
        .handle(&FileEvent::created(ws.source("Assets/EditorOnly/Menu.cs")))
        .unwrap();
    engine
        .handle(&FileEvent::created(ws.source("Assets/Editor/Legacy.cs")))
        .unwrap();

    ws.assert_registered("Tools", "Assets/EditorOnly/Menu.cs");
    ws.assert_registered("Assembly-CSharp", "Assets/Editor/Legacy.cs");
}

#[test]
fn dry_run_session_never_writes() {
    let ws = TestWorkspace::new();
    ws.manifest_with("Assembly-CSharp", UNITY_MANIFEST);
    let engine = engine_for(&ws, true);

    let report = engine
        .handle(&FileEvent::renamed(
            ws.path("Assets/Scripts/Enemy.cs"),
            ws.path("Assets/Scripts/Foe.cs"),
        ))
        .unwrap();

    assert!(report.dry_run);
    assert!(matches!(report.actions[0], SyncAction::Renamed { .. }));
    assert_eq!(report.previews.len(), 1);
    assert!(report.previews[0].contains(r#"-    <Compile Include="Assets\Scripts\Enemy.cs" />"#));
    assert!(report.previews[0].contains(r#"+    <Compile Include="Assets\Scripts\Foe.cs" />"#));
    assert_eq!(ws.read_manifest("Assembly-CSharp"), UNITY_MANIFEST);
}
