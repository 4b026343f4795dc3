//! `fugubot init` — First-time setup.

use fugubot_config::AppConfig;

const STARTER_GUIDE: &str = "\
# Hướng Dẫn Sử Dụng Fugu App

## Nạp tiền
1. Mở ứng dụng và chọn \"Deposit\".
2. Chọn Transak hoặc Banxa để nạp USDC về ví Sui.

## Tham gia dự đoán
1. Chọn một thị trường dự đoán đang mở.
2. Mua cổ phần cho kết quả bạn tin tưởng.

## Rút tiền
1. Chọn \"Withdraw\" và nhập số USDC muốn rút.
2. Xác nhận giao dịch trên ví Sui của bạn.
";

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🐡 Fugubot — First-Time Setup");
    println!("=============================\n");

    let config_path = AppConfig::config_path();
    if config_path.exists() {
        println!("⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run init.");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created {}", config_path.display());
    }

    let knowledge_path = std::path::Path::new("HUONG_DAN_SU_DUNG_APP.txt");
    if knowledge_path.exists() {
        println!("   Knowledge file exists: {}", knowledge_path.display());
    } else {
        std::fs::write(knowledge_path, STARTER_GUIDE)?;
        println!("✅ Created {}", knowledge_path.display());
    }

    println!("\n📝 Next steps:");
    println!(
        "   1. Set OPENROUTER_API_KEY or add api_key to {}",
        config_path.display()
    );
    println!("   2. Run: fugubot serve");
    println!("   3. Point the chat widget at POST /chat\n");

    Ok(())
}
