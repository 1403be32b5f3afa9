//! Bid-curve order wire types.
//!
//! Field names follow the auction API request body exactly (`auctionId`,
//! `areaCode`, `curvePoints`, ...). These names are a wire contract; the
//! camelCase rename must not be changed.

use serde::{Deserialize, Serialize};

/// One price/volume step of a bid curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub price: f64,
    pub volume: f64,
}

/// Bid curve for a single contract (one delivery interval).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Curve {
    pub contract_id: String,
    pub curve_points: Vec<CurvePoint>,
}

/// A complete curve order for one auction, area, and portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveOrder {
    pub auction_id: String,
    pub portfolio: Option<String>,
    pub area_code: String,
    pub comment: Option<String>,
    pub curves: Vec<Curve>,
}

/// Header fields shared by every curve in one order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderHeader {
    pub product_id: String,
    pub area_code: String,
    pub portfolio: Option<String>,
    pub comment: Option<String>,
}

impl Default for OrderHeader {
    fn default() -> Self {
        Self {
            product_id: "CWE_H_DA_1".into(),
            area_code: "FR".into(),
            portfolio: Some("FR-SUNFLOW".into()),
            comment: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_serializes_with_wire_field_names() {
        let order = CurveOrder {
            auction_id: "CWE_H_DA_1-20250520".into(),
            portfolio: Some("FR-SUNFLOW".into()),
            area_code: "FR".into(),
            comment: None,
            curves: vec![Curve {
                contract_id: "CWE_H_DA_1-20250521-11".into(),
                curve_points: vec![
                    CurvePoint { price: -500.0, volume: 0.0 },
                    CurvePoint { price: -0.01, volume: 0.0 },
                    CurvePoint { price: 0.0, volume: -1.5 },
                    CurvePoint { price: 4000.0, volume: -1.5 },
                ],
            }],
        };

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["auctionId"], "CWE_H_DA_1-20250520");
        assert_eq!(json["areaCode"], "FR");
        assert_eq!(json["comment"], serde_json::Value::Null);
        assert_eq!(json["curves"][0]["contractId"], "CWE_H_DA_1-20250521-11");
        assert_eq!(json["curves"][0]["curvePoints"][2]["volume"], -1.5);
    }

    #[test]
    fn order_roundtrips() {
        let order = CurveOrder {
            auction_id: "A".into(),
            portfolio: None,
            area_code: "FR".into(),
            comment: Some("test".into()),
            curves: vec![],
        };
        let json = serde_json::to_string(&order).unwrap();
        let back: CurveOrder = serde_json::from_str(&json).unwrap();
        assert_eq!(order, back);
    }

    #[test]
    fn default_header_targets_the_french_day_ahead_product() {
        let h = OrderHeader::default();
        assert_eq!(h.product_id, "CWE_H_DA_1");
        assert_eq!(h.area_code, "FR");
        assert_eq!(h.portfolio.as_deref(), Some("FR-SUNFLOW"));
        assert!(h.comment.is_none());
    }
}
