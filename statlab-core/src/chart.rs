// statlab-core/src/chart.rs
//! A small Plotly-compatible figure model.
//!
//! Only the trace kinds the pages draw are modelled. The serialized form is
//! handed to `Plotly.react` unchanged by the browser script.
//!
//! License: MIT OR Apache-2.0

use serde::Serialize;
use serde_json::Value;
use statlab_numeric::histogram::Bin;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

impl From<&str> for Title {
    fn from(text: &str) -> Self {
        Self { text: text.to_string() }
    }
}

impl From<String> for Title {
    fn from(text: String) -> Self {
        Self { text }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub showlegend: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bargap: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScatterMode {
    #[serde(rename = "lines")]
    Lines,
    #[serde(rename = "markers")]
    Markers,
    #[serde(rename = "lines+markers")]
    LinesMarkers,
}

/// Points may be `None`: Plotly draws a gap for a null coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterTrace {
    pub name: String,
    pub mode: ScatterMode,
    pub x: Vec<Option<f64>>,
    pub y: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxTrace {
    pub name: String,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTrace {
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<usize>,
    pub width: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Scatter(ScatterTrace),
    Box(BoxTrace),
    Bar(BarTrace),
}

impl Trace {
    pub fn scatter(
        name: impl Into<String>,
        mode: ScatterMode,
        x: Vec<Option<f64>>,
        y: Vec<Option<f64>>,
    ) -> Self {
        Trace::Scatter(ScatterTrace { name: name.into(), mode, x, y })
    }

    pub fn boxplot(name: impl Into<String>, y: Vec<f64>) -> Self {
        Trace::Box(BoxTrace { name: name.into(), y })
    }

    /// A bar per pre-computed histogram bin, tagged so the client can tell
    /// it apart from an ordinary bar chart.
    pub fn histogram(name: impl Into<String>, bins: &[Bin]) -> Self {
        Trace::Bar(BarTrace {
            name: name.into(),
            x: bins.iter().map(Bin::center).collect(),
            y: bins.iter().map(|b| b.count).collect(),
            width: bins.iter().map(Bin::width).collect(),
            meta: Some(serde_json::json!({ "type": "histogram" })),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    pub fn new(title: impl Into<Title>) -> Self {
        Self {
            data: Vec::new(),
            layout: Layout {
                title: title.into(),
                xaxis: Axis::default(),
                yaxis: Axis::default(),
                showlegend: true,
                bargap: None,
            },
        }
    }

    pub fn axes(mut self, x: &str, y: &str) -> Self {
        self.layout.xaxis.title = Some(x.into());
        self.layout.yaxis.title = Some(y.into());
        self
    }

    pub fn trace(mut self, trace: Trace) -> Self {
        self.data.push(trace);
        self
    }

    pub fn bargap(mut self, gap: f64) -> Self {
        self.layout.bargap = Some(gap);
        self
    }

    pub fn without_legend(mut self) -> Self {
        self.layout.showlegend = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scatter_serializes_nulls_and_mode() {
        let fig = Figure::new("Comparison")
            .axes("X", "Y")
            .trace(Trace::scatter("a", ScatterMode::LinesMarkers, vec![Some(1.0)], vec![None]));
        let value = serde_json::to_value(&fig).unwrap();
        assert_eq!(value["data"][0]["type"], json!("scatter"));
        assert_eq!(value["data"][0]["mode"], json!("lines+markers"));
        assert_eq!(value["data"][0]["y"], json!([null]));
        assert_eq!(value["layout"]["title"]["text"], json!("Comparison"));
        assert_eq!(value["layout"]["xaxis"]["title"]["text"], json!("X"));
        assert!(value["layout"].get("bargap").is_none());
    }

    #[test]
    fn test_histogram_trace_from_bins() {
        let bins = [
            Bin { lower: 0.0, upper: 2.0, count: 3 },
            Bin { lower: 2.0, upper: 4.0, count: 1 },
        ];
        let value = serde_json::to_value(Trace::histogram("Values", &bins)).unwrap();
        assert_eq!(value["type"], json!("bar"));
        assert_eq!(value["x"], json!([1.0, 3.0]));
        assert_eq!(value["y"], json!([3, 1]));
        assert_eq!(value["width"], json!([2.0, 2.0]));
        assert_eq!(value["meta"]["type"], json!("histogram"));
    }

    #[test]
    fn test_box_trace_tag() {
        let value = serde_json::to_value(Trace::boxplot("Population 1", vec![1.0])).unwrap();
        assert_eq!(value["type"], json!("box"));
        assert_eq!(value["name"], json!("Population 1"));
    }
}
