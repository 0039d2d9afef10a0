use anyhow::Result;

use glide_core::{AppConfig, EnvMotionQuery, MotionPreference, MotionQuery};

pub fn run(config: &AppConfig) -> Result<()> {
    let query = EnvMotionQuery::default();
    let platform = query.prefers_reduced_motion();
    let motion = MotionPreference::from_config(&config.motion, &query);

    let source = match (config.motion.force_reduced, platform) {
        (Some(_), _) => "config (motion.force_reduced)".to_string(),
        (None, Some(_)) => format!("environment ({})", EnvMotionQuery::DEFAULT_VAR),
        (None, None) => "default (platform did not answer)".to_string(),
    };

    println!("Reduced motion: {}", motion.is_reduced());
    println!("  Source: {}", source);
    if motion.is_reduced() {
        println!("  Transitions swap instantly, smooth scroll and ambient background are off.");
    }

    motion.teardown();
    Ok(())
}
