//! `fugubot doctor` — Diagnose configuration problems.

use fugubot_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Fugubot Doctor — System Diagnostics");
    println!("======================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_path();
    if config_path.exists() {
        println!("  ✅ Config file found: {}", config_path.display());
    } else {
        println!(
            "  ⚠️  No config file at {} — defaults apply; run `fugubot init`",
            config_path.display()
        );
        issues += 1;
    }

    match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Configuration valid");

            if config.has_api_key() {
                println!("  ✅ API key configured");
            } else {
                println!("  ⚠️  No API key — set OPENROUTER_API_KEY or add api_key to the config");
                issues += 1;
            }

            for file in &config.knowledge.files {
                if file.path.exists() {
                    println!("  ✅ Knowledge file present: {}", file.path.display());
                } else {
                    println!("  ⚠️  Knowledge file missing: {}", file.path.display());
                    issues += 1;
                }
            }
        }
        Err(e) => {
            println!("  ❌ Configuration invalid: {e}");
            issues += 1;
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
