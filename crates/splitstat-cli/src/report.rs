//! Plain-text statistical report
//!
//! Rates are printed in percent with one decimal; statistics and p-values
//! with four. Undefined statistics are printed as `N/A`.

use std::fmt::{self, Write as _};

use splitstat_analysis::{
    config::EngineConfig,
    metrics::GroupMetrics,
    record::Arm,
    result::TestResult,
    summary::SummaryPayload,
};

const NOT_AVAILABLE: &str = "N/A";

fn number(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_owned(), |v| format!("{v:.4}"))
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

fn write_metrics(out: &mut String, metrics: &[GroupMetrics]) -> fmt::Result {
    writeln!(out, "Conversion rates")?;
    writeln!(
        out,
        "  {:<12} {:>8} {:>10} {:>8} {:>17}",
        "arm", "n", "converted", "rate", "95% CI"
    )?;
    for row in metrics {
        let interval = format!("[{}, {}]", percent(row.ci_lower), percent(row.ci_upper));
        writeln!(
            out,
            "  {:<12} {:>8} {:>10} {:>8} {interval:>17}",
            row.arm,
            row.n,
            row.successes,
            percent(row.rate),
        )?;
        for (name, mean) in &row.auxiliary_means {
            writeln!(out, "  {:<12} mean {name}: {mean:.2}", "")?;
        }
    }
    Ok(())
}

fn write_test(out: &mut String, result: &TestResult) -> fmt::Result {
    writeln!(out, "{}", result.name)?;
    writeln!(out, "  statistic:          {}", number(result.statistic()))?;
    writeln!(out, "  p-value:            {}", number(result.p_value()))?;
    writeln!(
        out,
        "  degrees of freedom: {}",
        number(result.degrees_of_freedom())
    )?;
    match result.undefined_reason() {
        Some(reason) => writeln!(out, "  undefined:          {reason}")?,
        None => writeln!(
            out,
            "  significant:        {}",
            if result.is_significant { "yes" } else { "no" }
        )?,
    }
    Ok(())
}

fn write_recommendation(
    out: &mut String,
    payload: &SummaryPayload,
    config: &EngineConfig,
) -> fmt::Result {
    let control = payload.metrics_of(Arm::Control);
    let test = payload.metrics_of(Arm::Test);
    let lift = (test.rate - control.rate) * 100.0;

    writeln!(out, "Recommendation")?;
    if payload.difference_test.is_significant {
        let verdict = if lift > 0.0 {
            format!("'{}' outperforms '{}'", test.arm, control.arm)
        } else {
            format!("'{}' underperforms '{}'", test.arm, control.arm)
        };
        writeln!(
            out,
            "  {verdict} by {lift:+.1} percentage points (p < {}).",
            config.significance_level
        )?;
        writeln!(
            out,
            "  The effect size is {}.",
            payload.effect_size.interpretation.to_string().to_lowercase()
        )?;
    } else {
        writeln!(
            out,
            "  No significant difference between '{}' and '{}' ({lift:+.1} points).",
            test.arm, control.arm
        )?;
        writeln!(out, "  Keep the experiment running or keep the control.")?;
    }
    Ok(())
}

/// Renders the report of a summary.
pub fn render(payload: &SummaryPayload, config: &EngineConfig) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "A/B Test Statistical Report")?;
    writeln!(out, "===========================")?;
    writeln!(out)?;
    write_metrics(&mut out, &payload.metrics)?;
    writeln!(out)?;
    write_test(&mut out, &payload.difference_test)?;
    writeln!(out)?;
    write_test(&mut out, &payload.association_test)?;
    writeln!(out)?;
    writeln!(out, "Effect size (Cohen's d)")?;
    writeln!(
        out,
        "  d = {:.4} ({})",
        payload.effect_size.value, payload.effect_size.interpretation
    )?;
    writeln!(out)?;
    write_recommendation(&mut out, payload, config)?;
    Ok(out)
}
