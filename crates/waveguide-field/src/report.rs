//! Plain-text summary of a parameter set, its dispersion and its grid

use anyhow::Result;
use minijinja::{context, Environment};

use crate::dispersion::DispersionInfo;
use crate::grid::FieldGrid;
use crate::params::WaveParameters;

const REPORT_TEMPLATE: &str = r#"Waveguide field report
Generated: {{ timestamp }}

Mode:                   {{ mode }}
Frequency:              {{ frequency }} GHz
Amplitude:              {{ amplitude }}
Waveguide:              {{ width }} x {{ height }} cm
Time:                   {{ time }}

Cutoff frequency:       {{ cutoff }} GHz
Free-space wavelength:  {{ lambda0 }} cm
Guided wavelength:      {{ lambda_g }}
Status:                 {% if propagating %}propagating{% else %}evanescent (below cutoff){% endif %}
{% if grid_size %}
Grid:                   {{ grid_size }} x {{ grid_size }}
{% if field_range %}Field range:            [{{ field_range[0] }}, {{ field_range[1] }}]
{% else %}Field range:            no finite samples
{% endif %}{% endif %}"#;

/// Render the report. `grid` is optional so dispersion can be summarised
/// without evaluating a field.
pub fn render_report(params: &WaveParameters, grid: Option<&FieldGrid>) -> Result<String> {
    let info = DispersionInfo::from_params(params);

    let mut env = Environment::new();
    env.add_template("report", REPORT_TEMPLATE)?;
    let tmpl = env.get_template("report")?;

    let field_range = grid
        .and_then(FieldGrid::finite_range)
        .map(|(lo, hi)| vec![format!("{:.4}", lo), format!("{:.4}", hi)]);

    let output = tmpl.render(context! {
        timestamp => chrono::Utc::now().to_rfc3339(),
        mode => info.mode.label(),
        frequency => format!("{:.2}", params.frequency_ghz),
        amplitude => format!("{:.2}", params.amplitude),
        width => format!("{:.2}", params.width_cm),
        height => format!("{:.2}", params.height_cm),
        time => format!("{}", params.time),
        cutoff => format!("{:.2}", info.cutoff_frequency_ghz),
        lambda0 => format!("{:.2}", info.free_space_wavelength_cm),
        lambda_g => info.guided_wavelength_cm.to_string(),
        propagating => info.propagating,
        grid_size => grid.map(FieldGrid::size),
        field_range => field_range,
    })?;

    Ok(output)
}
