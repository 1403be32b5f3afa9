//! Static delivery-area table.
//!
//! Built once at first access. Two access modes: `area` returns `None`
//! for unknown codes, `area_strict` fails with a descriptive error for
//! callers that want unknown codes to be fatal.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;
use thiserror::Error;

/// One bidding area: short code, human-readable name, and ENTSO-E EIC code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Area {
    pub name: &'static str,
    pub code: &'static str,
    pub eic_code: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Area with key '{0}' not found")]
pub struct UnknownArea(pub String);

static AREAS: LazyLock<HashMap<&'static str, Area>> = LazyLock::new(|| {
    let areas = [
        Area { name: "Great Britain", code: "UK", eic_code: "10Y1001A1001A57G" },
        Area { name: "50Hertz Transmission GmbH", code: "50Hz", eic_code: "10YDE-VE-------2" },
        Area { name: "TransnetBW", code: "TBW", eic_code: "10YDE-ENBW-----N" },
        Area { name: "Amprion", code: "AMP", eic_code: "10YDE-RWENET---I" },
        Area { name: "TenneT Germany", code: "TTG", eic_code: "10YDE-EON------1" },
        Area { name: "Austria", code: "AT", eic_code: "10YAT-APG------L" },
        Area { name: "Netherlands", code: "NL", eic_code: "10YNL----------L" },
        Area { name: "France", code: "FR", eic_code: "10YFR-RTE------C" },
        Area { name: "NO1 Norway", code: "NO1", eic_code: "10YNO-1--------2" },
        Area { name: "NO2 Norway", code: "NO2", eic_code: "10YNO-2--------T" },
        Area { name: "NO3 Norway", code: "NO3", eic_code: "10YNO-3--------J" },
        Area { name: "NO4 Norway", code: "NO4", eic_code: "10YNO-4--------9" },
        Area { name: "NO5 Norway", code: "NO5", eic_code: "10Y1001A1001A48H" },
        Area { name: "Finland", code: "FI", eic_code: "10YFI-1--------U" },
        Area { name: "Belgium", code: "BE", eic_code: "10YBE----------2" },
        Area { name: "DK1 Denmark", code: "DK1", eic_code: "10YDK-1--------W" },
        Area { name: "DK2 Denmark", code: "DK2", eic_code: "10YDK-2--------M" },
        Area { name: "SE1 Sweden", code: "SE1", eic_code: "10Y1001A1001A44P" },
        Area { name: "SE2 Sweden", code: "SE2", eic_code: "10Y1001A1001A45N" },
        Area { name: "SE3 Sweden", code: "SE3", eic_code: "10Y1001A1001A46L" },
        Area { name: "SE4 Sweden", code: "SE4", eic_code: "10Y1001A1001A47J" },
        Area { name: "Estonia", code: "EE", eic_code: "10Y1001A1001A39I" },
        Area { name: "Latvia", code: "LV", eic_code: "10YLV-1001A00074" },
        Area { name: "Lithuania", code: "LT", eic_code: "10YLT-1001A0008Q" },
        Area { name: "Poland", code: "PL", eic_code: "10YPL-AREA-----S" },
    ];
    areas.into_iter().map(|a| (a.code, a)).collect()
});

/// Look up an area by its short code.
pub fn area(code: &str) -> Option<&'static Area> {
    AREAS.get(code)
}

/// Fail-fast lookup for callers that treat unknown codes as errors.
pub fn area_strict(code: &str) -> Result<&'static Area, UnknownArea> {
    area(code).ok_or_else(|| UnknownArea(code.to_string()))
}

/// All known areas, sorted by code for stable output.
pub fn all_areas() -> Vec<&'static Area> {
    let mut areas: Vec<&'static Area> = AREAS.values().collect();
    areas.sort_by_key(|a| a.code);
    areas
}
