use game_core::EquipmentSlotName;
use sage_client::{Client, ClientConfig, InputScript};
use tempfile::TempDir;
use ui_engine::Vec2;

fn worn_helm(client: &Client) -> Option<String> {
    let world = &client.host().world;
    let helm = world
        .registry
        .equipment
        .get(client.scene().leader)?
        .get(EquipmentSlotName::Helm)?;
    world.registry.items.get(helm).map(|item| item.name.clone())
}

#[test]
fn build_requires_a_config() {
    let err = Client::builder().build().err().expect("config is required");
    assert!(err.to_string().contains("Config is required"));
}

#[tokio::test]
async fn demo_session_opens_windows_and_equips_the_helm() {
    let mut client = Client::builder()
        .config(ClientConfig::new().with_frames(240))
        .build()
        .unwrap();
    assert_eq!(worn_helm(&client), None);

    let summary = client.run().await.unwrap();

    assert_eq!(summary.frames, 240);
    assert!(client.ui().is_visible(client.windows().inventory));
    assert!(client.ui().is_visible(client.windows().equipment));
    assert_eq!(worn_helm(&client).as_deref(), Some("Iron Helm"));
    assert!(summary.draw_commands > 0);
    assert_eq!(summary.draw_commands, client.renderer().commands().len());
}

#[tokio::test]
async fn snapshot_is_written_as_json() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("layouts").join("final.json");
    let mut client = Client::builder()
        .config(
            ClientConfig::new()
                .with_frames(2)
                .with_screen(1280.0, 720.0)
                .with_snapshot_path(&path),
        )
        .script(InputScript::new().hover(Vec2::new(10.0, 10.0), 2))
        .build()
        .unwrap();

    client.run().await.unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["viewport"]["x"], 1280.0);
    let windows = json["windows"].as_array().unwrap();
    assert_eq!(windows.len(), client.ui().windows().len());
    assert!(windows.iter().any(|window| window["name"] == "toolbar"));
}

#[tokio::test]
async fn idle_session_leaves_floating_windows_closed() {
    let mut client = Client::builder()
        .config(ClientConfig::new().with_frames(5))
        .script(InputScript::new())
        .build()
        .unwrap();

    let summary = client.run().await.unwrap();

    assert!(!client.ui().is_visible(client.windows().inventory));
    assert_eq!(summary.visible_windows, 2);
    assert_eq!(summary.banner, None);
}
