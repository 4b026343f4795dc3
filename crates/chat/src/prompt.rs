//! System prompt assembly.
//!
//! The prompt sent upstream has four blocks in a fixed order: the
//! persona preamble, the user information block, the reference
//! documents, and the response guidelines. The templates here are part
//! of the product voice; edit with the same care as user-facing copy.

use fugubot_core::{Category, UserContext};

/// Persona and ground rules, identical for every request.
const SYSTEM_PREAMBLE: &str = "\
You are a professional AI assistant for Fugu Protocol (Fugu Prediction Market).

## ROLE:
- Provide ACCURATE answers based on the provided documentation (HIGHEST PRIORITY)
- If information is not found in the documentation, USE YOUR OWN KNOWLEDGE to answer
  (especially related to Crypto, Blockchain, and Web3)
- Keep responses concise, clear, and professional
- Use appropriate emojis to improve readability

## CAPABILITIES & DATA:
1. 💰 Guide users on deposit and withdrawal processes (Transak, Banxa)
2. 🎯 Explain how to participate in predictions on Fugu
3. 📊 Analyze crypto markets and price action
4. 📚 Provide information about Fugu Protocol and the Sui Blockchain

## RULES:
- Prioritize questions related to Fugu Protocol and Prediction Markets
- ACCEPT questions about crypto market trends, token prices, and blockchain/Web3 developments
- Use general crypto knowledge if the Knowledge Base does not contain the answer
- REJECT questions that are completely unrelated
  (e.g. weather, cooking, non-economic politics, etc.)";

/// Assemble the full system prompt for one request.
///
/// `excerpts` are pre-clipped knowledge sections; when empty, the
/// reference block is omitted entirely so the model never sees an empty
/// heading.
pub fn build_system_prompt(
    category: Category,
    user_context: Option<&UserContext>,
    excerpts: &[String],
) -> String {
    let user_info = render_user_info(user_context);
    let reference = render_reference_docs(excerpts);
    let guidelines = render_guidelines(category);
    format!("{SYSTEM_PREAMBLE}\n\n{user_info}\n\n{reference}\n\n{guidelines}")
}

fn render_user_info(user_context: Option<&UserContext>) -> String {
    let Some(ctx) = user_context else {
        return "## USER INFORMATION:\n- Not logged in\n".to_string();
    };

    let wallet = ctx
        .wallet_address
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or("Not connected");
    let balance = ctx.balance.unwrap_or(0.0);
    let predictions = ctx.active_predictions.as_ref().map_or(0, Vec::len);
    let prefs = ctx.user_preferences.as_ref();
    let language = prefs
        .and_then(|p| p.language.as_deref())
        .filter(|s| !s.is_empty())
        .unwrap_or("en");
    let risk = prefs
        .and_then(|p| p.risk_level.as_deref())
        .filter(|s| !s.is_empty())
        .unwrap_or("medium");

    format!(
        "\n## USER INFORMATION:\n\
         - Wallet Address: {wallet}\n\
         - Balance: {balance} USDC\n\
         - Active Predictions: {predictions}\n\
         - Language: {language}\n\
         - Risk Level: {risk}\n"
    )
}

fn render_reference_docs(excerpts: &[String]) -> String {
    if excerpts.is_empty() {
        return String::new();
    }
    let mut block = String::from("\n\n## REFERENCE DOCUMENTS:\n\n");
    for excerpt in excerpts {
        block.push_str(excerpt);
        block.push_str("\n---\n");
    }
    block
}

fn render_guidelines(category: Category) -> String {
    format!(
        r#"## RESPONSE GUIDELINES:
- Question Category: {category}
  - **IGNORE** the "Language" field in USER INFORMATION if it conflicts with the detected language of the message.
- PRIORITY 1: Find the answer in "REFERENCE DOCUMENTS" above.
- PRIORITY 2: If the documentation is insufficient, use your general knowledge to provide the most accurate answer possible.
- PRIORITY 3: Rejected any question that is completely unrelated to Fugu Protocol or Prediction Markets.
- PRIORITY 4: If the question is about a specific prediction, use the "Active Predictions" field in USER INFORMATION to provide the most accurate answer possible."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fugubot_core::UserPreferences;

    fn signed_in() -> UserContext {
        UserContext {
            wallet_address: Some("0xfugu".into()),
            balance: Some(150.5),
            active_predictions: Some(vec![serde_json::json!({"id": 1})]),
            user_preferences: Some(UserPreferences {
                language: Some("vi".into()),
                risk_level: Some("high".into()),
            }),
        }
    }

    #[test]
    fn anonymous_user_renders_not_logged_in() {
        let prompt = build_system_prompt(Category::General, None, &[]);
        assert!(prompt.contains("## USER INFORMATION:\n- Not logged in"));
        assert!(!prompt.contains("Wallet Address"));
    }

    #[test]
    fn signed_in_user_renders_account_snapshot() {
        let prompt = build_system_prompt(Category::Payment, Some(&signed_in()), &[]);
        assert!(prompt.contains("- Wallet Address: 0xfugu"));
        assert!(prompt.contains("- Balance: 150.5 USDC"));
        assert!(prompt.contains("- Active Predictions: 1"));
        assert!(prompt.contains("- Language: vi"));
        assert!(prompt.contains("- Risk Level: high"));
    }

    #[test]
    fn absent_fields_fall_back_to_defaults() {
        let ctx = UserContext::default();
        let prompt = build_system_prompt(Category::General, Some(&ctx), &[]);
        assert!(prompt.contains("- Wallet Address: Not connected"));
        assert!(prompt.contains("- Balance: 0 USDC"));
        assert!(prompt.contains("- Active Predictions: 0"));
        assert!(prompt.contains("- Language: en"));
        assert!(prompt.contains("- Risk Level: medium"));
    }

    #[test]
    fn reference_block_is_omitted_without_excerpts() {
        let prompt = build_system_prompt(Category::General, None, &[]);
        assert!(!prompt.contains("## REFERENCE DOCUMENTS:"));
    }

    #[test]
    fn excerpts_are_joined_with_separators() {
        let excerpts = vec!["## Guide\n\nStep one.".to_string(), "## FAQ\n\nQ&A.".to_string()];
        let prompt = build_system_prompt(Category::Tutorial, None, &excerpts);
        assert!(prompt.contains("## REFERENCE DOCUMENTS:"));
        assert!(prompt.contains("Step one.\n---\n"));
        assert!(prompt.contains("Q&A.\n---\n"));
    }

    #[test]
    fn guidelines_echo_the_category() {
        let prompt = build_system_prompt(Category::Blockchain, None, &[]);
        assert!(prompt.contains("- Question Category: blockchain"));
    }

    #[test]
    fn blocks_appear_in_canonical_order() {
        let excerpts = vec!["## Guide\n\nBody.".to_string()];
        let prompt = build_system_prompt(Category::Market, Some(&signed_in()), &excerpts);
        let persona = prompt.find("You are a professional AI assistant").unwrap();
        let user = prompt.find("## USER INFORMATION:").unwrap();
        let docs = prompt.find("## REFERENCE DOCUMENTS:").unwrap();
        let guidelines = prompt.find("## RESPONSE GUIDELINES:").unwrap();
        assert!(persona < user && user < docs && docs < guidelines);
    }
}
