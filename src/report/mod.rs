//! Static HTML report over a saved value table
//!
//! This is a downstream consumer of the persisted file, not part of the
//! learning core: it parses the raw JSON document itself and tolerates
//! whatever values it finds (an undecodable key renders as `?` instead of
//! failing the whole report).

use std::{collections::BTreeMap, fmt::Write as _, fs, io::ErrorKind, path::Path};

use crate::{
    error::{Error, Result},
    types::{BOARD_SIZE, StateKey},
};

/// Row classification thresholds: a state with a move valued above
/// `WIN_THRESHOLD` shows learned winning knowledge, one with a move below
/// `LOSS_THRESHOLD` (and nothing above) shows learned mistakes.
const WIN_THRESHOLD: f64 = 1.0;
const LOSS_THRESHOLD: f64 = -1.0;

/// Counts reported back to the caller after rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSummary {
    pub states: usize,
    pub winning_states: usize,
    pub error_states: usize,
}

/// Render the table at `table_path` into a self-contained HTML file.
///
/// # Errors
///
/// Returns an error when the table file is missing or unparseable, or when
/// the output file cannot be written.
pub fn generate<P: AsRef<Path>, Q: AsRef<Path>>(
    table_path: P,
    output_path: Q,
) -> Result<ReportSummary> {
    let table_path = table_path.as_ref();
    let raw = fs::read_to_string(table_path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => Error::Io {
            operation: format!("find value table {} (train first)", table_path.display()),
            source,
        },
        _ => Error::Io {
            operation: format!("read value table {}", table_path.display()),
            source,
        },
    })?;

    let data: BTreeMap<String, BTreeMap<String, f64>> = serde_json::from_str(&raw)?;

    let mut body = String::new();
    let mut winning_states = 0;
    let mut error_states = 0;

    // BTreeMap iteration keeps rows sorted by state key.
    for (state_text, actions) in &data {
        let values: Vec<f64> = (0..BOARD_SIZE)
            .map(|i| actions.get(&i.to_string()).copied().unwrap_or(0.0))
            .collect();
        let max_value = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min_value = values.iter().copied().fold(f64::INFINITY, f64::min);

        let row_class = if max_value > WIN_THRESHOLD {
            winning_states += 1;
            "row-winning"
        } else if min_value < LOSS_THRESHOLD {
            error_states += 1;
            "row-losing"
        } else {
            "row-neutral"
        };

        let _ = write!(
            body,
            "<tr class='{row_class}'><td><div class='board'>{}</div></td>\
             <td class='key'>{state_text}</td>",
            board_visual(state_text)
        );

        for &value in &values {
            let value_class = if value > 0.0 {
                "val-pos"
            } else if value < 0.0 {
                "val-neg"
            } else {
                "val-zero"
            };
            if value == max_value && value != 0.0 {
                let _ = write!(
                    body,
                    "<td class='best'><span class='{value_class}'>★ {value:.1}</span></td>"
                );
            } else {
                let _ = write!(
                    body,
                    "<td><span class='{value_class}'>{value:.2}</span></td>"
                );
            }
        }
        body.push_str("</tr>\n");
    }

    let html = render_page(&body);
    let output_path = output_path.as_ref();
    fs::write(output_path, html).map_err(|source| Error::Io {
        operation: format!("write report {}", output_path.display()),
        source,
    })?;

    Ok(ReportSummary {
        states: data.len(),
        winning_states,
        error_states,
    })
}

/// Three-line mini board for one state key; `?` when the key does not decode.
fn board_visual(state_text: &str) -> String {
    let Ok(key) = StateKey::parse(state_text) else {
        return "?".to_string();
    };
    let Ok(cells) = key.decode() else {
        return "?".to_string();
    };

    cells
        .chunks(3)
        .map(|row| {
            row.iter()
                .map(|c| match c.to_char() {
                    ' ' => '·',
                    other => other,
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("<br>")
}

fn render_page(rows: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>Value Table Report</title>
<style>
body {{ font-family: 'Segoe UI', sans-serif; background-color: #f0f2f5; padding: 20px; color: #333; }}
h1 {{ text-align: center; color: #2c3e50; }}
.controls {{ text-align: center; margin: 20px 0; position: sticky; top: 0; background: #f0f2f5; padding: 10px; z-index: 100; }}
button {{ padding: 10px 20px; margin: 0 5px; border: none; border-radius: 5px; cursor: pointer; font-weight: bold; }}
.btn-all {{ background-color: #34495e; color: white; }}
.btn-win {{ background-color: #27ae60; color: white; }}
.btn-loss {{ background-color: #c0392b; color: white; }}
.btn-neutral {{ background-color: #7f8c8d; color: white; }}
table {{ width: 100%; border-collapse: collapse; background-color: white; border-radius: 8px; overflow: hidden; }}
th, td {{ padding: 12px 10px; text-align: center; border-bottom: 1px solid #ecf0f1; }}
th {{ background-color: #2980b9; color: white; }}
.board {{ font-family: 'Courier New', monospace; font-weight: bold; line-height: 14px; display: inline-block; border: 1px solid #bdc3c7; padding: 4px; background: #ecf0f1; border-radius: 4px; }}
.key {{ font-size: 0.75em; color: #7f8c8d; }}
.val-pos {{ color: #27ae60; font-weight: bold; }}
.val-neg {{ color: #c0392b; }}
.val-zero {{ color: #bdc3c7; font-size: 0.85em; }}
.best {{ background-color: #d5f5e3; border: 2px solid #2ecc71; border-radius: 4px; }}
.hidden {{ display: none; }}
</style>
</head>
<body>
<h1>Q-Learning Value Table</h1>
<div class="controls">
<button class="btn-all" onclick="filterRows('all')">All</button>
<button class="btn-win" onclick="filterRows('winning')">Winning moves</button>
<button class="btn-loss" onclick="filterRows('losing')">Learned mistakes</button>
<button class="btn-neutral" onclick="filterRows('neutral')">Unexplored</button>
</div>
<table id="q-table">
<thead>
<tr><th>Board</th><th>State key</th><th>0</th><th>1</th><th>2</th><th>3</th><th>4</th><th>5</th><th>6</th><th>7</th><th>8</th></tr>
</thead>
<tbody>
{rows}</tbody>
</table>
<script>
function filterRows(kind) {{
  document.querySelectorAll('#q-table tbody tr').forEach(row => {{
    if (kind === 'all' || row.classList.contains('row-' + kind)) {{
      row.classList.remove('hidden');
    }} else {{
      row.classList.add('hidden');
    }}
  }});
}}
</script>
</body>
</html>
"#
    )
}
