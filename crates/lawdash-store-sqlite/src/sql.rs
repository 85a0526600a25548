//! Rendering [`Predicate`] trees to SQL.
//!
//! Every operand becomes a `?` placeholder with its value pushed onto the
//! parameter list, so filter values never reach the SQL text.

use lawdash_core::filter::{Field, Operand, Predicate};
use rusqlite::types::Value;

/// Resolves the derived filter dimensions for every row of `lawsuits`.
///
/// `gpt_summary` fields fall back to their defaults when the document is not
/// JSON text (including BLOB-stored JSONB) or the field has the wrong type,
/// matching
/// [`GptSummary`](lawdash_core::lawsuit::GptSummary) decoding. `CASE` is
/// used rather than `AND` because only `CASE` guarantees the JSON functions
/// are not evaluated on invalid input.
pub const DERIVED: &str = r#"
WITH derived AS (
  SELECT
    id,
    filed,
    title,
    gpt_summary,
    law360_data,
    strftime('%Y-%m-%dT%H:%M:%fZ', filed) AS filed_utc,
    date(filed) AS filed_date,
    CASE
      WHEN typeof(gpt_summary) <> 'text' THEN 'Unknown'
      WHEN json_valid(gpt_summary) THEN
        CASE json_type(gpt_summary, '$.likely_country_of_origin')
          WHEN 'text' THEN json_extract(gpt_summary, '$.likely_country_of_origin')
          ELSE 'Unknown'
        END
      ELSE 'Unknown'
    END AS country,
    COALESCE(agency_manually_set, 'Unknown') AS agency,
    agency_manually_set,
    CASE
      WHEN typeof(gpt_summary) <> 'text' THEN 0
      WHEN json_valid(gpt_summary) THEN
        CASE WHEN json_type(gpt_summary, '$."221g_score"') IN ('integer', 'real')
          THEN json_extract(gpt_summary, '$."221g_score"')
          ELSE 0
        END
      ELSE 0
    END AS score
  FROM lawsuits
)
"#;

/// A `WHERE` clause body and its positional parameters.
#[derive(Debug, Default)]
pub struct Fragment {
  pub sql:    String,
  pub params: Vec<Value>,
}

pub fn column(field: Field) -> &'static str {
  match field {
    Field::FiledDate => "filed_date",
    Field::Country => "country",
    Field::Agency => "agency",
    Field::Score => "score",
  }
}

fn bind(operand: &Operand) -> Value {
  match operand {
    Operand::Date(d) => Value::Text(d.format("%Y-%m-%d").to_string()),
    Operand::Text(s) => Value::Text(s.clone()),
    Operand::Number(n) => Value::Real(*n),
  }
}

pub fn render(predicate: &Predicate) -> Fragment {
  let mut fragment = Fragment::default();
  render_into(predicate, &mut fragment);
  fragment
}

fn render_into(predicate: &Predicate, out: &mut Fragment) {
  match predicate {
    Predicate::Eligible => {
      out.sql.push_str("(gpt_summary IS NOT NULL AND law360_data IS NOT NULL)");
    }
    Predicate::Between { field, low, high } => {
      out.sql.push_str(&format!("({} BETWEEN ? AND ?)", column(*field)));
      out.params.push(bind(low));
      out.params.push(bind(high));
    }
    Predicate::In { values, .. } if values.is_empty() => out.sql.push('0'),
    Predicate::In { field, values } => {
      let placeholders = vec!["?"; values.len()].join(", ");
      out.sql.push_str(&format!("({} IN ({placeholders}))", column(*field)));
      out.params.extend(values.iter().map(bind));
    }
    Predicate::And(terms) if terms.is_empty() => out.sql.push('1'),
    Predicate::And(terms) => {
      out.sql.push('(');
      for (i, term) in terms.iter().enumerate() {
        if i > 0 {
          out.sql.push_str(" AND ");
        }
        render_into(term, out);
      }
      out.sql.push(')');
    }
  }
}
