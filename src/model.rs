use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

pub const DISCOUNT_RANGE: RangeInclusive<u32> = 5..=45;
pub const CREDIT_RANGE: RangeInclusive<u32> = 300..=900;
pub const AGE_RANGE: RangeInclusive<u32> = 18..=60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdIntensity {
    Low,
    Medium,
    High,
}

impl AdIntensity {
    pub const ALL: [AdIntensity; 3] = [AdIntensity::Low, AdIntensity::Medium, AdIntensity::High];

    pub fn code(self) -> u8 {
        match self {
            AdIntensity::Low => 0,
            AdIntensity::Medium => 1,
            AdIntensity::High => 2,
        }
    }

    pub fn value(self) -> f64 {
        match self {
            AdIntensity::Low => 100.0,
            AdIntensity::Medium => 200.0,
            AdIntensity::High => 350.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AdIntensity::Low => "Low",
            AdIntensity::Medium => "Medium",
            AdIntensity::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    Necessity,
    Luxury,
}

impl ProductType {
    pub const ALL: [ProductType; 2] = [ProductType::Necessity, ProductType::Luxury];

    pub fn code(self) -> u8 {
        match self {
            ProductType::Necessity => 0,
            ProductType::Luxury => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProductType::Necessity => "Necessity",
            ProductType::Luxury => "Luxury",
        }
    }
}

// Rupees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncomeBucket {
    Upto3L,
    From3To5L,
    From5To10L,
    From10To25L,
    From25To50L,
}

impl IncomeBucket {
    pub const ALL: [IncomeBucket; 5] = [
        IncomeBucket::Upto3L,
        IncomeBucket::From3To5L,
        IncomeBucket::From5To10L,
        IncomeBucket::From10To25L,
        IncomeBucket::From25To50L,
    ];

    pub fn bounds(self) -> (u32, u32) {
        match self {
            IncomeBucket::Upto3L => (100_000, 300_000),
            IncomeBucket::From3To5L => (300_001, 500_000),
            IncomeBucket::From5To10L => (500_001, 1_000_000),
            IncomeBucket::From10To25L => (1_000_001, 2_500_000),
            IncomeBucket::From25To50L => (2_500_001, 5_000_000),
        }
    }

    pub fn midpoint(self) -> f64 {
        midpoint(self.bounds())
    }

    pub fn label(self) -> &'static str {
        match self {
            IncomeBucket::Upto3L => "₹1,00,000 - ₹3,00,000",
            IncomeBucket::From3To5L => "₹3,00,001 - ₹5,00,000",
            IncomeBucket::From5To10L => "₹5,00,001 - ₹10,00,000",
            IncomeBucket::From10To25L => "₹10,00,001 - ₹25,00,000",
            IncomeBucket::From25To50L => "₹25,00,001 - ₹50,00,000",
        }
    }
}

// Rupees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceBucket {
    From10To20K,
    From20To50K,
    From50KTo1L,
    From1To5L,
    From5To10L,
}

impl PriceBucket {
    pub const ALL: [PriceBucket; 5] = [
        PriceBucket::From10To20K,
        PriceBucket::From20To50K,
        PriceBucket::From50KTo1L,
        PriceBucket::From1To5L,
        PriceBucket::From5To10L,
    ];

    pub fn bounds(self) -> (u32, u32) {
        match self {
            PriceBucket::From10To20K => (10_000, 20_000),
            PriceBucket::From20To50K => (20_001, 50_000),
            PriceBucket::From50KTo1L => (50_001, 100_000),
            PriceBucket::From1To5L => (100_001, 500_000),
            PriceBucket::From5To10L => (500_001, 1_000_000),
        }
    }

    pub fn midpoint(self) -> f64 {
        midpoint(self.bounds())
    }

    pub fn label(self) -> &'static str {
        match self {
            PriceBucket::From10To20K => "₹10,000 - ₹20,000",
            PriceBucket::From20To50K => "₹20,001 - ₹50,000",
            PriceBucket::From50KTo1L => "₹50,001 - ₹1,00,000",
            PriceBucket::From1To5L => "₹1,00,001 - ₹5,00,000",
            PriceBucket::From5To10L => "₹5,00,001 - ₹10,00,000",
        }
    }
}

fn midpoint((low, high): (u32, u32)) -> f64 {
    (low as f64 + high as f64) / 2.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub ad_intensity: AdIntensity,
    pub product_type: ProductType,
    pub income_bucket: IncomeBucket,
    pub price_bucket: PriceBucket,
    pub discount_pct: u32,
    pub credit_score: u32,
    pub age: u32,
}

impl Default for PredictionRequest {
    fn default() -> Self {
        PredictionRequest {
            ad_intensity: AdIntensity::Medium,
            product_type: ProductType::Necessity,
            income_bucket: IncomeBucket::Upto3L,
            price_bucket: PriceBucket::From10To20K,
            discount_pct: *DISCOUNT_RANGE.start(),
            credit_score: *CREDIT_RANGE.start(),
            age: *AGE_RANGE.start(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Yes,
    No,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Yes => write!(f, "YES ✅"),
            Verdict::No => write!(f, "NO ❌"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub probability: f64, // 0..=1
    pub verdict: Verdict,
}

impl Prediction {
    pub fn percent(&self) -> f64 {
        self.probability * 100.0
    }

    pub fn message(&self) -> String {
        format!("{}\nSuccess Probability: {:.2}%", self.verdict, self.percent())
    }
}
