//! HTML rendering through an embedded minijinja template. No external assets.
//! The template name ends in `.html`, so every interpolated value is escaped.

use minijinja::{context, Environment};

use crate::{DrawSummary, ReportError};

static TEMPLATE: &str = r#"<!doctype html>
<html lang="en"><meta charset="utf-8">
<title>{{ s.title }}</title>
<h1>{{ s.title }}</h1>
<p>Drawing {{ s.drawing_id }}, executed {{ s.executed_at }} by {{ s.executed_by }} (seed {{ s.seed }})</p>

<h2>Allocations</h2>
<table>
<tr><th>#</th><th>Participant</th><th>Period</th><th>Dates</th><th>Apartment</th><th>Priority</th></tr>
{%- for p in s.participants %}
{%- if p.slots %}
{%- for slot in p.slots %}
<tr><td>{{ p.position }}</td><td>{{ p.name }}</td><td>{{ slot.period }}</td><td>{{ slot.start_date }} to {{ slot.end_date }}</td><td>{{ slot.apartment }}</td><td>{{ slot.priority }}</td></tr>
{%- endfor %}
{%- else %}
<tr class="none"><td>{{ p.position }}</td><td>{{ p.name }}</td><td colspan="4">no allocation</td></tr>
{%- endif %}
{%- endfor %}
</table>

{% if s.periods %}
<h2>Per period</h2>
<ul>
{%- for r in s.periods %}
<li>{{ r.period }}: {{ r.allocated }}</li>
{%- endfor %}
</ul>
{% endif %}

<h2>Totals</h2>
<p>{{ s.totals.allocations }} allocations for {{ s.totals.participants }} participants
(none: {{ s.totals.with_zero }}, one: {{ s.totals.with_one }}, two: {{ s.totals.with_two }})</p>
<p class="muted">Execution {{ s.execution_id }}</p>
</html>
"#;

pub fn render_html(s: &DrawSummary) -> Result<String, ReportError> {
    let mut env = Environment::new();
    env.add_template("summary.html", TEMPLATE)
        .map_err(|e| ReportError::Template(e.to_string()))?;
    let tmpl = env
        .get_template("summary.html")
        .map_err(|e| ReportError::Template(e.to_string()))?;
    tmpl.render(context! { s => s })
        .map_err(|e| ReportError::Template(e.to_string()))
}
