//! Prompts sent to the plan provider.

use anyhow::Result;
use shared::PlanRequest;

pub const SYSTEM_PROMPT: &str = "You are a frugal but friendly Indian personal-finance coach. \
Return ONLY valid JSON, no markdown, no ``` fences, no explanations outside JSON.";

const PLAN_SCHEMA: &str = r#"{
  "summary": "string",
  "assumptions": ["string"],
  "months": [
    {
      "monthOffset": 1,
      "label": "Month 1",
      "budget": {
        "monthlySavings": number,
        "usedForPurchases": number,
        "leftover": number
      },
      "purchases": [
        {
          "itemId": "id from input",
          "itemName": "name",
          "price": number,
          "notes": "reasoning"
        }
      ],
      "tips": ["string"]
    }
  ]
}"#;

/// User prompt embedding the `{ finance, items }` snapshot and the exact
/// shape the answer has to follow
pub fn build_user_prompt(request: &PlanRequest) -> Result<String> {
    let snapshot = serde_json::to_string_pretty(request)?;

    Ok(format!(
        "Here is the current situation as JSON:\n\n\
         {snapshot}\n\n\
         Create a month-by-month purchase plan.\n\n\
         Output JSON only with this structure:\n\n\
         {PLAN_SCHEMA}\n"
    ))
}
