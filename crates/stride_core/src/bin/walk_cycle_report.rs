// Walk/kick smoke run with a JSON cycle report
// Run with: cargo run --bin walk_cycle_report --release

use anyhow::Result;
use nalgebra::Vector3;
use serde_json::json;
use stride_core::{
    behavior::BehaviorId, Angle, EngineConfig, MovementEngine, WorldSnapshot,
};

fn main() -> Result<()> {
    let mut world = WorldSnapshot::default();
    world.ball.position = Vector3::new(0.25, -0.1, 0.0);

    let mut engine = MovementEngine::new(EngineConfig::default())?;
    engine.request_behavior(BehaviorId::Walk);
    engine.set_movement(60.0, 0.0, Angle::deg(0.0));

    // walk up to speed
    let mut stride_starts = 0;
    let mut min_foot_z = f32::MAX;
    let mut max_foot_z = f32::MIN;
    for _ in 0..150 {
        let targets = engine.perform_cycle(&world);
        if engine.is_new_step() {
            stride_starts += 1;
        }
        min_foot_z = min_foot_z.min(targets.left_foot.z).min(targets.right_foot.z);
        max_foot_z = max_foot_z.max(targets.left_foot.z).max(targets.right_foot.z);
    }

    let walk_step = engine.walk_behavior().current_step();
    let kick_scores = engine.evaluate_kicks(&world, Angle::ZERO, 7.0);

    // request the right-footed kick and run it to completion
    engine.request_behavior(BehaviorId::Kick(1));
    let mut cycles_to_kick = None;
    for cycle in 0..400 {
        engine.perform_cycle(&world);
        if let BehaviorId::Kick(index) = engine.current_behavior() {
            if engine.kick(index).map(|k| k.is_finished()).unwrap_or(false) {
                cycles_to_kick = Some(cycle);
                break;
            }
        }
    }

    let report = json!({
        "version": stride_core::VERSION,
        "walk": {
            "stride_starts": stride_starts,
            "forward_amplitude": walk_step.forward,
            "turn_degrees": walk_step.turn.degrees(),
            "foot_z_range": [min_foot_z, max_foot_z],
        },
        "kicks": kick_scores.iter().map(|s| json!({
            "name": s.name,
            "applicability": s.applicability,
            "executability": s.executability,
        })).collect::<Vec<_>>(),
        "kick_finished_after_cycles": cycles_to_kick,
    });

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
