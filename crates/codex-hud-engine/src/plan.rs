use codex_hud_providers::codex::fields::{self, Object};
use codex_hud_types::PlanItem;
use serde_json::Value;

/// Parse the step list of a plan event.
///
/// Steps come from `plan`, or from `steps` when `plan` is not a list. Entries
/// without string `status` and `step` fields are dropped.
pub fn parse_plan(payload: &Object) -> Vec<PlanItem> {
    let raw = fields::array_field(payload, "plan")
        .or_else(|| fields::array_field(payload, "steps"));

    raw.map(|items| items.iter().filter_map(parse_item).collect())
        .unwrap_or_default()
}

fn parse_item(item: &Value) -> Option<PlanItem> {
    let item = item.as_object()?;
    let status = fields::str_field(item, "status")?;
    let step = fields::str_field(item, "step")?;
    Some(PlanItem::new(status, step))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Object {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_parse_plan_field() {
        let payload = obj(json!({
            "type": "plan_update",
            "plan": [
                {"status": "completed", "step": "A"},
                {"status": "in_progress", "step": "B"}
            ]
        }));
        let plan = parse_plan(&payload);
        assert_eq!(plan, vec![PlanItem::new("completed", "A"), PlanItem::new("in_progress", "B")]);
    }

    #[test]
    fn test_parse_steps_field() {
        let payload = obj(json!({"steps": [{"status": "pending", "step": "Only"}]}));
        assert_eq!(parse_plan(&payload), vec![PlanItem::new("pending", "Only")]);
    }

    #[test]
    fn test_plan_takes_precedence_over_steps() {
        let payload = obj(json!({
            "plan": [{"status": "pending", "step": "from plan"}],
            "steps": [{"status": "pending", "step": "from steps"}]
        }));
        assert_eq!(parse_plan(&payload)[0].step, "from plan");
    }

    #[test]
    fn test_non_list_plan_falls_through_to_steps() {
        let payload = obj(json!({
            "plan": "not a list",
            "steps": [{"status": "pending", "step": "from steps"}]
        }));
        assert_eq!(parse_plan(&payload)[0].step, "from steps");
    }

    #[test]
    fn test_drops_incomplete_entries() {
        let payload = obj(json!({
            "plan": [
                {"status": "completed"},
                {"step": "no status"},
                {"status": 1, "step": "numeric status"},
                "bare string",
                {"status": "pending", "step": "kept"}
            ]
        }));
        assert_eq!(parse_plan(&payload), vec![PlanItem::new("pending", "kept")]);
    }

    #[test]
    fn test_missing_list() {
        assert!(parse_plan(&obj(json!({"type": "plan_update"}))).is_empty());
    }
}
