use crate::query::YearRange;

/// UI language. The dashboard text comes in Chinese and English.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Lang {
    Zh,
    #[default]
    En,
}

impl Lang {
    pub fn title(self, range: YearRange) -> String {
        match self {
            Lang::Zh => format!(
                "{}-{}年中国及其附近国家或地区地震数据查询、可视化与热点分析",
                range.min, range.max
            ),
            Lang::En => format!(
                "Earthquakes {}–{}: query, visualization and hotspot analysis",
                range.min, range.max
            ),
        }
    }

    pub fn selector_title(self) -> &'static str {
        match self {
            Lang::Zh => "选择国家或地区",
            Lang::En => "Select Country",
        }
    }

    pub fn point_map_title(self, country: &str) -> String {
        match self {
            Lang::Zh => format!("{country}的地震地图"),
            Lang::En => format!("Earthquake map: {country}"),
        }
    }

    pub fn table_title(self) -> &'static str {
        match self {
            Lang::Zh => "地震数据",
            Lang::En => "Earthquake data",
        }
    }

    pub fn chart_title(self, range: YearRange, country: &str) -> String {
        match self {
            Lang::Zh => format!("{}-{}年{country}的地震点数量", range.min, range.max),
            Lang::En => format!("Earthquakes per year, {country}"),
        }
    }

    /// Axis names for the bar chart: years along, counts up.
    pub fn chart_axes(self) -> &'static str {
        match self {
            Lang::Zh => "年份 / 地震点数量",
            Lang::En => "year / count",
        }
    }

    pub fn heat_map_title(self) -> &'static str {
        match self {
            Lang::Zh => "热点分析",
            Lang::En => "Hotspot analysis",
        }
    }

    /// Column headers for the data table, in display order.
    pub fn table_headers(self) -> [&'static str; 7] {
        match self {
            Lang::Zh => ["时间", "位置", "纬度", "经度", "震级", "深度", "国家或地区"],
            Lang::En => ["Time", "Place", "Lat", "Lon", "Mag", "Depth", "Country"],
        }
    }

    /// Field labels for marker popups: place, magnitude, depth, time.
    pub fn popup_labels(self) -> [&'static str; 4] {
        match self {
            Lang::Zh => ["位置", "震级", "震源深度", "时间"],
            Lang::En => ["Place", "Magnitude", "Depth", "Time"],
        }
    }

    /// The record count line shown under the selector.
    pub fn count_message(self, range: YearRange, country: &str, count: usize) -> String {
        match self {
            Lang::Zh => format!("{}-{}年{country}有{count}个地震点", range.min, range.max),
            Lang::En => format!(
                "From {}–{}, {country} had {count} earthquake points",
                range.min, range.max
            ),
        }
    }
}
