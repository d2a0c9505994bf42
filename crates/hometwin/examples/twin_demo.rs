//! Drives a small two-room home through the scene runtime: load config and
//! mesh, stream a few sensor events, run the frame loop, pick a room.
//!
//! Run with: `RUST_LOG=info cargo run --example twin_demo`

use hometwin::{HomeConfig, MeshPayload, Scene, SensorUpdate, Vec2, Vec3};

const HOME_CONFIG: &str = r#"{
    "home_id": "My_Smart_Home_001",
    "rooms": [
        {"id": "room_a", "name": "Master Bedroom", "owner": "User A", "sensors": [
            {"id": "motion_01", "type": "PIR", "status": "idle", "location": [1.5, 0.2, 0]},
            {"id": "door_01", "type": "DoorContact", "status": "closed", "location": [3.0, 0.5, 0]}
        ]},
        {"id": "room_b", "name": "Living Room", "owner": "Common Area", "sensors": [
            {"id": "smoke_01", "type": "Smoke", "status": "normal", "location": [0, 2.5, 0]},
            {"id": "temp_02", "type": "Temperature", "status": "24.5°C", "location": [-1.0, 0.2, 0]}
        ]}
    ]
}"#;

const MESH_PAYLOAD: &str = r#"{
    "mesh_id": "demo-mesh",
    "mesh_format": "mesh_json_v2",
    "data": {
        "floor": {
            "vertices": [[-2,-1.5,0],[4,-1.5,0],[4,3,0],[-2,3,0]],
            "faces": [[0,1,2],[0,2,3]]
        },
        "walls": {
            "vertices": [[-2,-1.5,0],[4,-1.5,0],[4,-1.5,2.8],[-2,-1.5,2.8]],
            "faces": [[0,2,1],[0,3,2]]
        },
        "metadata": {
            "rooms": {
                "room_a": {"polygon": [[1,-1.5],[4,-1.5],[4,3],[1,3]], "name": "Master Bedroom"},
                "room_b": {"polygon": [[-2,-1.5],[1,-1.5],[1,3],[-2,3]], "name": "Living Room"}
            },
            "world_offset": {"x": 0.0, "y": 0.0, "z": 0.0}
        }
    }
}"#;

fn main() {
    env_logger::init();

    let mut scene = Scene::new();

    let config = HomeConfig::from_json(HOME_CONFIG).expect("home config");
    scene.apply_home_config(&config);

    let payload = MeshPayload::from_json(MESH_PAYLOAD).expect("mesh payload");
    scene.apply_mesh_update(&payload);

    println!(
        "scene ready: {} layer meshes, {} overlays, {} markers",
        scene.layers().len(),
        scene.overlays().len(),
        scene.markers().len()
    );

    // The smoke detector trips.
    let alarm = SensorUpdate::from_json(
        r#"{"sensor_id": "smoke_01", "type": "Smoke", "new_status": "alarm",
            "is_alert": true, "room_id": "room_b", "room_name": "Living Room"}"#,
    )
    .expect("sensor event");
    scene.apply_sensor_update(&alarm);
    println!("alerting rooms: {:?}", scene.alert_rooms());

    // A few frames of the render loop.
    for frame in 0..8 {
        let now = f64::from(frame) * 0.016;
        scene.advance(now);
        let pulse = scene
            .overlays()
            .get("room_b")
            .map_or(0.0, |overlay| overlay.material.opacity);
        println!("t={now:.3}s  room_b overlay opacity {pulse:.3}");
    }

    // Click the middle of the viewport-projected bedroom.
    let target = Vec3::new(2.5, 0.02, 0.75);
    let clip = scene.camera().view_projection_matrix() * target.extend(1.0);
    let ndc = clip.truncate() / clip.w;
    let pos = Vec2::new((ndc.x + 1.0) * 0.5 * 1280.0, (1.0 - ndc.y) * 0.5 * 720.0);
    if let Some(hit) = scene.pick_at(pos, 1280.0, 720.0) {
        println!("picked room: {} at {:?}", hit.room_id, hit.world_position);
    }
    for event in scene.drain_events() {
        println!("event: {event:?}");
    }

    for summary in scene.room_summaries() {
        println!(
            "room {:<10} {:<16} sensors={} alerts={}",
            summary.id,
            summary.name,
            summary.sensor_ids.len(),
            summary.alert_count
        );
    }
}
