//! The price range bar chart.
//!
//! The chart is an ECharts bar chart whose options are generated with
//! `charming`. Its initialisation script is rendered inline next to the chart
//! container so that it runs again whenever htmx swaps the board in.
//!
//! The chart theme is chosen once for the whole process with
//! [register_chart_theme] and read by every chart rendered afterwards.

use std::{fmt::Display, str::FromStr, sync::OnceLock};

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{AxisPointer, AxisPointerType, AxisType, Tooltip, Trigger},
    series::Bar,
};
use maud::{Markup, PreEscaped, html};

use crate::models::PriceHistogram;

/// The ID of the chart container.
pub(super) const HISTOGRAM_CHART_ID: &str = "price-histogram-chart";

/// The colour scheme used for charts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChartTheme {
    /// Follow the browser's light or dark mode preference.
    #[default]
    Auto,
    /// Always use the light ECharts theme.
    Light,
    /// Always use the dark ECharts theme.
    Dark,
}

impl Display for ChartTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChartTheme::Auto => "auto",
            ChartTheme::Light => "light",
            ChartTheme::Dark => "dark",
        };

        write!(f, "{name}")
    }
}

impl FromStr for ChartTheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ChartTheme::Auto),
            "light" => Ok(ChartTheme::Light),
            "dark" => Ok(ChartTheme::Dark),
            other => Err(format!(
                "\"{other}\" is not a chart theme, expected auto, light or dark"
            )),
        }
    }
}

static CHART_THEME: OnceLock<ChartTheme> = OnceLock::new();

/// Set the chart theme for the rest of the process.
///
/// Only the first call has any effect. Returns `false` if a theme was already registered.
pub fn register_chart_theme(theme: ChartTheme) -> bool {
    let registered = CHART_THEME.set(theme).is_ok();

    if registered {
        tracing::debug!("registered chart theme {theme}");
    } else {
        tracing::warn!("a chart theme was already registered, ignoring {theme}");
    }

    registered
}

/// The registered chart theme, or the default if none was registered.
fn chart_theme() -> ChartTheme {
    CHART_THEME.get().copied().unwrap_or_default()
}

/// Build the bar chart for `histogram` with one bar per price range.
///
/// Price ranges the API sent no count for are left without a bar.
pub(super) fn price_histogram_chart(histogram: &PriceHistogram, month_label: &str) -> Chart {
    let (labels, counts): (Vec<_>, Vec<_>) = histogram
        .bars()
        .map(|(range, count)| (range.label().to_owned(), count.map(|count| count as f64)))
        .unzip();

    Chart::new()
        .title(
            Title::new()
                .text("Bar Chart Stats")
                .subtext(month_label.to_owned()),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .name("Price Range")
                .data(labels),
        )
        .y_axis(Axis::new().type_(AxisType::Value).name("# of Items"))
        .series(Bar::new().name("# of Items in Price Range").data(counts))
}

/// Render the chart container and the script that draws `chart` into it.
pub(super) fn chart_view(chart: &Chart) -> Markup {
    html!(
        section class="w-full mx-auto mb-4"
        {
            div
                id=(HISTOGRAM_CHART_ID)
                class="min-h-[380px] rounded dark:bg-gray-100"
            {}

            script { (chart_script(HISTOGRAM_CHART_ID, &chart.to_string(), chart_theme())) }
        }
    )
}

fn chart_script(id: &str, options: &str, theme: ChartTheme) -> PreEscaped<String> {
    let apply_theme = match theme {
        ChartTheme::Auto => {
            r#"const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                const updateTheme = () => {
                    chart.setTheme(darkModeMediaQuery.matches ? 'dark' : 'default');
                };
                darkModeMediaQuery.addEventListener('change', updateTheme);
                updateTheme();"#
        }
        ChartTheme::Light => "chart.setTheme('default');",
        ChartTheme::Dark => "chart.setTheme('dark');",
    };

    PreEscaped(format!(
        r#"(function() {{
                const chartDom = document.getElementById("{id}");
                const chart = echarts.getInstanceByDom(chartDom) || echarts.init(chartDom);
                chart.setOption({options});
                window.addEventListener('resize', chart.resize);
                {apply_theme}
            }})();"#
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::models::{PriceBucket, PriceHistogram};

    use super::{ChartTheme, chart_script, price_histogram_chart};

    fn chart_json(histogram: &PriceHistogram) -> Value {
        let chart = price_histogram_chart(histogram, "March");
        serde_json::from_str(&chart.to_string()).expect("chart options should be valid JSON")
    }

    #[test]
    fn labels_come_from_the_fixed_price_ranges() {
        let histogram = PriceHistogram::from_buckets(&[PriceBucket { count: 3 }]);

        let json = chart_json(&histogram);
        let labels = json["xAxis"][0]["data"]
            .as_array()
            .or_else(|| json["xAxis"]["data"].as_array())
            .expect("x axis should have labels")
            .clone();

        assert_eq!(labels.len(), 10);
        assert_eq!(labels[0], "0-100");
        assert_eq!(labels[9], "901-above");
    }

    #[test]
    fn full_histogram_draws_every_bar_in_order() {
        let counts = [5, 10, 15, 7, 2, 0, 0, 0, 0, 0];
        let buckets: Vec<_> = counts.iter().map(|&count| PriceBucket { count }).collect();

        let json = chart_json(&PriceHistogram::from_buckets(&buckets));
        let data: Vec<_> = json["series"][0]["data"]
            .as_array()
            .expect("series should have data")
            .iter()
            .map(|value| value.as_f64())
            .collect();

        let expected: Vec<_> = counts.iter().map(|&count| Some(count as f64)).collect();
        assert_eq!(data, expected);
    }

    #[test]
    fn short_histogram_leaves_missing_bars_empty() {
        let histogram =
            PriceHistogram::from_buckets(&[PriceBucket { count: 3 }, PriceBucket { count: 4 }]);

        let json = chart_json(&histogram);
        let series = json["series"]
            .as_array()
            .expect("chart should have a series list");
        let data = series[0]["data"].as_array().expect("series should have data");

        assert_eq!(data.len(), 10);
        assert_eq!(data[0], 3.0);
        assert_eq!(data[1], 4.0);
        assert!(data[2].as_f64().is_none(), "expected no bar, got {}", data[2]);
        assert_eq!(series[0]["name"], "# of Items in Price Range");
    }

    #[test]
    fn parses_theme_names() {
        assert_eq!("auto".parse::<ChartTheme>(), Ok(ChartTheme::Auto));
        assert_eq!(" Dark ".parse::<ChartTheme>(), Ok(ChartTheme::Dark));
        assert_eq!("light".parse::<ChartTheme>(), Ok(ChartTheme::Light));
        assert!("sepia".parse::<ChartTheme>().is_err());
    }

    #[test]
    fn fixed_theme_skips_media_query() {
        let script = chart_script("chart", "{}", ChartTheme::Dark).into_string();

        assert!(script.contains("chart.setTheme('dark');"));
        assert!(!script.contains("prefers-color-scheme"));
    }

    #[test]
    fn auto_theme_follows_media_query() {
        let script = chart_script("chart", "{}", ChartTheme::Auto).into_string();

        assert!(script.contains("prefers-color-scheme"));
    }
}
