use crate::model::PredictionRequest;

// Training schema, in the order the model was fit on.
pub const COLUMNS: [&str; 21] = [
    "Age",
    "Annual_Income",
    "Credit_Score",
    "Product_Type_enc",
    "Product_Price",
    "Discount_Offered(%)",
    "Affordability_Ratio",
    "Ad_Calls",
    "Ad_SMS",
    "Ad_Social",
    "Ad_Display",
    "Ad_Intensity_Num",
    "Ad_Intensity_Value",
    "Normalized_Ad_Intensity",
    "Log_Price",
    "Log_Income",
    "Discount_to_Afford",
    "Credit_Afford_Interaction",
    "Income_to_Credit",
    "Discount_Intensity",
    "Price_to_Income",
];

// Channel counts the form never collects; the model still expects them.
const AD_CALLS: f64 = 10.0;
const AD_SMS: f64 = 100.0;
const AD_SOCIAL: f64 = 50.0;
const AD_DISPLAY: f64 = 10.0;

const AD_INTENSITY_SCALE: f64 = 400.0;

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: [f64; COLUMNS.len()],
}

impl FeatureVector {
    pub fn index_of(name: &str) -> Option<usize> {
        COLUMNS.iter().position(|c| *c == name)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        Self::index_of(name).map(|i| self.values[i])
    }

    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        COLUMNS.iter().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        COLUMNS.iter().copied().zip(self.values.iter().copied())
    }

    pub fn first_non_finite(&self) -> Option<(&'static str, f64)> {
        self.iter().find(|(_, v)| !v.is_finite())
    }
}

// A zero credit score surfaces as an infinite Income_to_Credit.
pub fn derive_features(req: &PredictionRequest) -> FeatureVector {
    let income = req.income_bucket.midpoint();
    let price = req.price_bucket.midpoint();
    let discount = req.discount_pct as f64;
    let credit = req.credit_score as f64;

    let afford_ratio = price / income;
    let ad_value = req.ad_intensity.value();

    let values = [
        req.age as f64,
        income,
        credit,
        req.product_type.code() as f64,
        price,
        discount,
        afford_ratio,
        AD_CALLS,
        AD_SMS,
        AD_SOCIAL,
        AD_DISPLAY,
        req.ad_intensity.code() as f64,
        ad_value,
        ad_value / AD_INTENSITY_SCALE,
        price.ln_1p(),
        income.ln_1p(),
        discount * (1.0 - afford_ratio),
        credit * (1.0 - afford_ratio),
        income / credit,
        discount * ad_value,
        price / income,
    ];

    FeatureVector { values }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AdIntensity, IncomeBucket, PriceBucket, ProductType};

    fn scenario() -> PredictionRequest {
        PredictionRequest {
            ad_intensity: AdIntensity::Medium,
            product_type: ProductType::Luxury,
            income_bucket: IncomeBucket::From5To10L,
            price_bucket: PriceBucket::From1To5L,
            discount_pct: 20,
            credit_score: 650,
            age: 30,
        }
    }

    fn all_requests() -> Vec<PredictionRequest> {
        let mut out = Vec::new();
        for ad in AdIntensity::ALL {
            for product in ProductType::ALL {
                for income in IncomeBucket::ALL {
                    for price in PriceBucket::ALL {
                        for credit in [300, 650, 900] {
                            out.push(PredictionRequest {
                                ad_intensity: ad,
                                product_type: product,
                                income_bucket: income,
                                price_bucket: price,
                                discount_pct: 20,
                                credit_score: credit,
                                age: 40,
                            });
                        }
                    }
                }
            }
        }
        out
    }

    #[test]
    fn scenario_values() {
        let fv = derive_features(&scenario());
        let get = |n: &str| fv.get(n).unwrap();

        assert_eq!(get("Age"), 30.0);
        assert_eq!(get("Annual_Income"), 750_000.5);
        assert_eq!(get("Product_Price"), 300_000.5);
        assert_eq!(get("Product_Type_enc"), 1.0);
        assert_eq!(get("Ad_Intensity_Num"), 1.0);
        assert_eq!(get("Ad_Intensity_Value"), 200.0);
        assert_eq!(get("Normalized_Ad_Intensity"), 0.5);
        assert_eq!(get("Discount_Intensity"), 4000.0);

        let ratio = 300_000.5 / 750_000.5;
        assert!((get("Affordability_Ratio") - 0.4000001).abs() < 1e-6);
        assert!((get("Discount_to_Afford") - 20.0 * (1.0 - ratio)).abs() < 1e-12);
        assert!((get("Credit_Afford_Interaction") - 650.0 * (1.0 - ratio)).abs() < 1e-9);
        assert!((get("Income_to_Credit") - 1153.8469).abs() < 1e-4);
        assert!((get("Log_Price") - 300_001.5_f64.ln()).abs() < 1e-12);
        assert!((get("Log_Income") - 750_001.5_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn constant_channel_columns() {
        for req in all_requests() {
            let fv = derive_features(&req);
            assert_eq!(fv.get("Ad_Calls"), Some(10.0));
            assert_eq!(fv.get("Ad_SMS"), Some(100.0));
            assert_eq!(fv.get("Ad_Social"), Some(50.0));
            assert_eq!(fv.get("Ad_Display"), Some(10.0));
        }
    }

    #[test]
    fn ratio_columns_are_duplicates() {
        for req in all_requests() {
            let fv = derive_features(&req);
            assert_eq!(fv.get("Affordability_Ratio"), fv.get("Price_to_Income"));
        }
    }

    #[test]
    fn income_to_credit_is_positive_midpoint_ratio() {
        for req in all_requests() {
            let fv = derive_features(&req);
            let v = fv.get("Income_to_Credit").unwrap();
            assert_eq!(v, req.income_bucket.midpoint() / req.credit_score as f64);
            assert!(v > 0.0);
        }
    }

    #[test]
    fn normalized_intensity_levels() {
        let level = |ad| {
            let req = PredictionRequest { ad_intensity: ad, ..scenario() };
            derive_features(&req).get("Normalized_Ad_Intensity").unwrap()
        };
        assert_eq!(level(AdIntensity::Low), 0.25);
        assert_eq!(level(AdIntensity::Medium), 0.5);
        assert_eq!(level(AdIntensity::High), 0.875);
    }

    #[test]
    fn credit_extremes_stay_finite() {
        for credit in [300, 900] {
            for req in all_requests() {
                let req = PredictionRequest { credit_score: credit, ..req };
                assert!(derive_features(&req).first_non_finite().is_none());
            }
        }
    }

    #[test]
    fn zero_credit_is_flagged_non_finite() {
        let req = PredictionRequest { credit_score: 0, ..scenario() };
        let (name, _) = derive_features(&req).first_non_finite().unwrap();
        assert_eq!(name, "Income_to_Credit");
    }

    #[test]
    fn derivation_is_idempotent() {
        let req = scenario();
        assert_eq!(derive_features(&req), derive_features(&req));
    }

    #[test]
    fn schema_order_and_lookup() {
        let fv = derive_features(&scenario());
        assert_eq!(fv.len(), 21);
        assert_eq!(fv.names().collect::<Vec<_>>(), COLUMNS.to_vec());
        assert_eq!(FeatureVector::index_of("Discount_Offered(%)"), Some(5));
        assert_eq!(fv.value_at(5), Some(20.0));
        assert!(fv.get("Ad_Email").is_none());
    }
}
