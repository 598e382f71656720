use super::types::{CellValue, TabularDataset};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_PALETTE: [&str; 10] = [
    "#3B82F6", "#EF4444", "#10B981", "#F59E0B", "#8B5CF6",
    "#EC4899", "#06B6D4", "#84CC16", "#F97316", "#6366F1",
];

pub const DEFAULT_BORDER_WIDTH: f64 = 2.0;
pub const DEFAULT_TENSION: f64 = 0.1;
pub const DEFAULT_POINT_RADIUS: f64 = 4.0;

const DATASET_LABEL: &str = "Data";
const FILL_ALPHA: &str = "40";
const SLICE_BORDER_ALPHA: &str = "80";
const POINT_HIGHLIGHT: &str = "#fff";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartType {
    Line,
    Bar,
    Pie,
    Scatter,
    Doughnut,
    Radar,
    PolarArea,
    #[serde(rename = "3d-bar")]
    Bar3d,
    #[serde(rename = "3d-scatter")]
    Scatter3d,
    #[serde(rename = "3d-surface")]
    Surface3d,
}

/// Payload layout shared by a group of chart types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFamily {
    Slice,
    Radial,
    Cartesian,
}

impl ChartType {
    pub const ALL: [ChartType; 10] = [
        ChartType::Line,
        ChartType::Bar,
        ChartType::Pie,
        ChartType::Scatter,
        ChartType::Doughnut,
        ChartType::Radar,
        ChartType::PolarArea,
        ChartType::Bar3d,
        ChartType::Scatter3d,
        ChartType::Surface3d,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChartType::Line => "line",
            ChartType::Bar => "bar",
            ChartType::Pie => "pie",
            ChartType::Scatter => "scatter",
            ChartType::Doughnut => "doughnut",
            ChartType::Radar => "radar",
            ChartType::PolarArea => "polarArea",
            ChartType::Bar3d => "3d-bar",
            ChartType::Scatter3d => "3d-scatter",
            ChartType::Surface3d => "3d-surface",
        }
    }

    pub fn family(self) -> ChartFamily {
        match self {
            ChartType::Pie | ChartType::Doughnut => ChartFamily::Slice,
            ChartType::Radar | ChartType::PolarArea => ChartFamily::Radial,
            _ => ChartFamily::Cartesian,
        }
    }

    pub fn is_3d(self) -> bool {
        matches!(
            self,
            ChartType::Bar3d | ChartType::Scatter3d | ChartType::Surface3d
        )
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown chart type: {}", s)))
    }
}

/// User-supplied styling. Every field is optional; unset fields use defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
}

impl ChartStyle {
    /// Custom palette when one is supplied, the default palette otherwise.
    pub fn palette(&self) -> Vec<String> {
        match &self.colors {
            Some(colors) if !colors.is_empty() => colors.clone(),
            _ => DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn border_width_or_default(&self) -> f64 {
        self.border_width.unwrap_or(DEFAULT_BORDER_WIDTH)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    Single(String),
    PerItem(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Vec<CellValue>,
    pub background_color: ColorValue,
    pub border_color: ColorValue,
    pub border_width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_hover_background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_hover_border_color: Option<String>,
}

impl ChartDataset {
    fn new(
        data: Vec<CellValue>,
        background_color: ColorValue,
        border_color: ColorValue,
        border_width: f64,
    ) -> Self {
        Self {
            label: None,
            data,
            background_color,
            border_color,
            border_width,
            fill: None,
            tension: None,
            point_radius: None,
            point_background_color: None,
            point_border_color: None,
            point_hover_background_color: None,
            point_hover_border_color: None,
        }
    }
}

/// Labels plus datasets, in the layout the charting library consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPayload {
    pub labels: Vec<CellValue>,
    pub datasets: Vec<ChartDataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    #[serde(rename = "xAxis")]
    pub x_column: String,
    #[serde(rename = "yAxis")]
    pub y_column: String,
    #[serde(rename = "config")]
    pub style: ChartStyle,
    #[serde(rename = "data")]
    pub payload: RenderPayload,
}

/// Builds a chart from two named columns of the dataset.
///
/// Each column is resolved independently: empty cells are dropped per column,
/// so labels and data can differ in length when the columns are unevenly
/// sparse.
pub fn build_chart_spec(
    dataset: &TabularDataset,
    x_column: &str,
    y_column: &str,
    chart_type: ChartType,
    style: ChartStyle,
) -> Result<ChartSpec, AppError> {
    let x_index = dataset
        .column_index(x_column)
        .ok_or_else(|| AppError::ColumnNotFound(x_column.to_string()))?;
    let y_index = dataset
        .column_index(y_column)
        .ok_or_else(|| AppError::ColumnNotFound(y_column.to_string()))?;

    let labels: Vec<CellValue> = dataset.column_values(x_index).into_iter().cloned().collect();
    let data: Vec<CellValue> = dataset.column_values(y_index).into_iter().cloned().collect();

    tracing::debug!(
        "Building {} chart: {} labels, {} values",
        chart_type,
        labels.len(),
        data.len()
    );

    let payload = render_payload(labels, data, chart_type, &style);

    Ok(ChartSpec {
        chart_type,
        x_column: x_column.to_string(),
        y_column: y_column.to_string(),
        style,
        payload,
    })
}

pub fn render_payload(
    labels: Vec<CellValue>,
    data: Vec<CellValue>,
    chart_type: ChartType,
    style: &ChartStyle,
) -> RenderPayload {
    let palette = style.palette();
    let primary = palette[0].clone();

    let dataset = match chart_type.family() {
        ChartFamily::Slice => {
            let slices = labels.len().max(data.len());
            let background: Vec<String> = (0..slices)
                .map(|i| palette[i % palette.len()].clone())
                .collect();
            let border = background
                .iter()
                .map(|c| format!("{}{}", c, SLICE_BORDER_ALPHA))
                .collect();

            ChartDataset::new(
                data,
                ColorValue::PerItem(background),
                ColorValue::PerItem(border),
                style.border_width_or_default(),
            )
        }
        ChartFamily::Radial => ChartDataset {
            label: Some(DATASET_LABEL.to_string()),
            point_background_color: Some(primary.clone()),
            point_border_color: Some(POINT_HIGHLIGHT.to_string()),
            point_hover_background_color: Some(POINT_HIGHLIGHT.to_string()),
            point_hover_border_color: Some(primary.clone()),
            ..ChartDataset::new(
                data,
                ColorValue::Single(format!("{}{}", primary, FILL_ALPHA)),
                ColorValue::Single(primary),
                style.border_width_or_default(),
            )
        },
        ChartFamily::Cartesian => {
            let background = style
                .background_color
                .clone()
                .unwrap_or_else(|| format!("{}{}", primary, FILL_ALPHA));
            let border = style.border_color.clone().unwrap_or(primary);

            ChartDataset {
                label: Some(DATASET_LABEL.to_string()),
                fill: Some(style.fill.unwrap_or(false)),
                tension: Some(style.tension.unwrap_or(DEFAULT_TENSION)),
                point_radius: Some(style.point_radius.unwrap_or(DEFAULT_POINT_RADIUS)),
                ..ChartDataset::new(
                    data,
                    ColorValue::Single(background),
                    ColorValue::Single(border),
                    style.border_width_or_default(),
                )
            }
        }
    };

    RenderPayload {
        labels,
        datasets: vec![dataset],
    }
}

/// Display options for the rendering collaborator.
pub fn chart_options(
    chart_type: ChartType,
    title: &str,
    x_title: Option<&str>,
    y_title: Option<&str>,
) -> Value {
    let mut options = json!({
        "responsive": true,
        "maintainAspectRatio": false,
        "plugins": {
            "title": {
                "display": true,
                "text": title,
                "font": { "size": 16, "weight": "bold" }
            },
            "legend": { "display": true, "position": "top" }
        }
    });

    if chart_type.family() == ChartFamily::Cartesian {
        options["scales"] = json!({
            "x": {
                "display": true,
                "title": { "display": true, "text": x_title.unwrap_or("X Axis") }
            },
            "y": {
                "display": true,
                "title": { "display": true, "text": y_title.unwrap_or("Y Axis") }
            }
        });
    }

    options
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenePoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub label: String,
    pub color: String,
}

/// Points for the 3D view, taken from the first three columns of the first
/// `limit` rows. A missing or non-numeric x uses the row index; y and z use 0.
pub fn scene_points(dataset: &TabularDataset, limit: usize, style: &ChartStyle) -> Vec<ScenePoint> {
    let palette = style.palette();

    dataset
        .rows()
        .iter()
        .take(limit)
        .enumerate()
        .map(|(index, row)| ScenePoint {
            x: number_at(row, 0).unwrap_or(index as f64),
            y: number_at(row, 1).unwrap_or(0.0),
            z: number_at(row, 2).unwrap_or(0.0),
            label: format!("Point {}", index + 1),
            color: palette[index % palette.len()].clone(),
        })
        .collect()
}

fn number_at(row: &[CellValue], col: usize) -> Option<f64> {
    row.get(col).and_then(CellValue::as_number)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sales() -> TabularDataset {
        TabularDataset::new(
            vec!["Region".into(), "Revenue".into()],
            vec![
                vec![CellValue::Text("A".into()), CellValue::Number(10.0)],
                vec![CellValue::Text("B".into()), CellValue::Number(20.0)],
                vec![CellValue::Text("C".into()), CellValue::Number(30.0)],
            ],
        )
    }

    #[test]
    fn test_pie_uses_palette_per_slice() {
        let spec = build_chart_spec(&sales(), "Region", "Revenue", ChartType::Pie, ChartStyle::default()).unwrap();

        assert_eq!(
            spec.payload.labels,
            vec![
                CellValue::Text("A".into()),
                CellValue::Text("B".into()),
                CellValue::Text("C".into())
            ]
        );
        assert_eq!(spec.payload.datasets.len(), 1);
        let dataset = &spec.payload.datasets[0];
        assert_eq!(
            dataset.data,
            vec![CellValue::Number(10.0), CellValue::Number(20.0), CellValue::Number(30.0)]
        );
        assert_eq!(
            dataset.background_color,
            ColorValue::PerItem(DEFAULT_PALETTE[..3].iter().map(|c| c.to_string()).collect())
        );
        assert_eq!(
            dataset.border_color,
            ColorValue::PerItem(vec!["#3B82F680".into(), "#EF444480".into(), "#10B98180".into()])
        );
        assert_eq!(dataset.border_width, 2.0);
        assert_eq!(dataset.label, None);
    }

    #[test]
    fn test_slice_palette_cycles() {
        let labels: Vec<CellValue> = (0..12).map(|i| CellValue::Number(i as f64)).collect();
        let payload = render_payload(labels.clone(), labels, ChartType::Doughnut, &ChartStyle::default());

        match &payload.datasets[0].background_color {
            ColorValue::PerItem(colors) => {
                assert_eq!(colors.len(), 12);
                assert_eq!(colors[10], DEFAULT_PALETTE[0]);
                assert_eq!(colors[11], DEFAULT_PALETTE[1]);
            }
            other => panic!("expected per-slice colors, got {:?}", other),
        }
    }

    #[test]
    fn test_radial_uses_first_palette_color() {
        let style = ChartStyle {
            colors: Some(vec!["#111111".into(), "#222222".into()]),
            ..ChartStyle::default()
        };
        let spec = build_chart_spec(&sales(), "Region", "Revenue", ChartType::Radar, style).unwrap();
        let dataset = &spec.payload.datasets[0];

        assert_eq!(dataset.background_color, ColorValue::Single("#11111140".into()));
        assert_eq!(dataset.border_color, ColorValue::Single("#111111".into()));
        assert_eq!(dataset.point_background_color.as_deref(), Some("#111111"));
        assert_eq!(dataset.point_border_color.as_deref(), Some("#fff"));
        assert_eq!(dataset.label.as_deref(), Some("Data"));
    }

    #[test]
    fn test_cartesian_defaults() {
        let spec = build_chart_spec(&sales(), "Region", "Revenue", ChartType::Line, ChartStyle::default()).unwrap();
        let dataset = &spec.payload.datasets[0];

        assert_eq!(dataset.background_color, ColorValue::Single("#3B82F640".into()));
        assert_eq!(dataset.border_color, ColorValue::Single("#3B82F6".into()));
        assert_eq!(dataset.border_width, DEFAULT_BORDER_WIDTH);
        assert_eq!(dataset.fill, Some(false));
        assert_eq!(dataset.tension, Some(DEFAULT_TENSION));
        assert_eq!(dataset.point_radius, Some(DEFAULT_POINT_RADIUS));
    }

    #[test]
    fn test_explicit_style_overrides_defaults() {
        let style = ChartStyle {
            background_color: Some("#000000".into()),
            border_color: Some("#ffffff".into()),
            border_width: Some(0.0),
            fill: Some(true),
            tension: Some(0.0),
            point_radius: Some(0.0),
            colors: None,
        };
        let spec = build_chart_spec(&sales(), "Region", "Revenue", ChartType::Bar, style).unwrap();
        let dataset = &spec.payload.datasets[0];

        assert_eq!(dataset.background_color, ColorValue::Single("#000000".into()));
        assert_eq!(dataset.border_color, ColorValue::Single("#ffffff".into()));
        assert_eq!(dataset.border_width, 0.0);
        assert_eq!(dataset.fill, Some(true));
        assert_eq!(dataset.tension, Some(0.0));
        assert_eq!(dataset.point_radius, Some(0.0));
    }

    #[test]
    fn test_unknown_column_is_rejected() {
        let err = build_chart_spec(&sales(), "Nope", "Revenue", ChartType::Bar, ChartStyle::default()).unwrap_err();
        assert!(matches!(err, AppError::ColumnNotFound(ref name) if name == "Nope"));

        let err = build_chart_spec(&sales(), "Region", "Nope", ChartType::Bar, ChartStyle::default()).unwrap_err();
        assert!(matches!(err, AppError::ColumnNotFound(_)));
    }

    #[test]
    fn test_sparse_columns_are_not_aligned() {
        let dataset = TabularDataset::new(
            vec!["x".into(), "y".into()],
            vec![
                vec![CellValue::Text("a".into()), CellValue::Empty],
                vec![CellValue::Text("b".into()), CellValue::Number(2.0)],
                vec![CellValue::Empty, CellValue::Number(3.0)],
                vec![CellValue::Text("d".into()), CellValue::Text(String::new())],
            ],
        );
        let spec = build_chart_spec(&dataset, "x", "y", ChartType::Bar, ChartStyle::default()).unwrap();

        assert_eq!(spec.payload.labels.len(), 3);
        assert_eq!(spec.payload.datasets[0].data, vec![CellValue::Number(2.0), CellValue::Number(3.0)]);
    }

    #[test]
    fn test_chart_type_tags() {
        for chart_type in ChartType::ALL {
            let json = serde_json::to_string(&chart_type).unwrap();
            assert_eq!(json, format!("\"{}\"", chart_type.as_str()));
            assert_eq!(chart_type.as_str().parse::<ChartType>().unwrap(), chart_type);
        }
        assert!("histogram".parse::<ChartType>().is_err());
        assert!(ChartType::Surface3d.is_3d());
        assert!(!ChartType::Scatter.is_3d());
    }

    #[test]
    fn test_options_only_add_scales_for_cartesian() {
        let bar = chart_options(ChartType::Bar, "Revenue", Some("Region"), None);
        assert_eq!(bar["scales"]["x"]["title"]["text"], "Region");
        assert_eq!(bar["scales"]["y"]["title"]["text"], "Y Axis");
        assert_eq!(bar["plugins"]["title"]["text"], "Revenue");

        let pie = chart_options(ChartType::Pie, "Share", None, None);
        assert!(pie.get("scales").is_none());
    }

    #[test]
    fn test_scene_points_fall_back_for_non_numeric_cells() {
        let dataset = TabularDataset::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![
                vec![CellValue::Number(5.0), CellValue::Number(6.0), CellValue::Number(7.0)],
                vec![CellValue::Text("x".into()), CellValue::Empty, CellValue::Text("9".into())],
                vec![CellValue::Number(1.0), CellValue::Number(1.0), CellValue::Number(1.0)],
            ],
        );

        let points = scene_points(&dataset, 2, &ChartStyle::default());
        assert_eq!(points.len(), 2);
        assert_eq!((points[0].x, points[0].y, points[0].z), (5.0, 6.0, 7.0));
        assert_eq!((points[1].x, points[1].y, points[1].z), (1.0, 0.0, 9.0));
        assert_eq!(points[1].label, "Point 2");
        assert_eq!(points[1].color, DEFAULT_PALETTE[1]);
    }
}
