/// Display bucket for a ΔT value, one per palette color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Missing,
    Above9,
    Above6,
    Above3,
    Above0,
    Zero,
    Below0,
    BelowMinus3,
    BelowMinus6,
    BelowMinus9,
}

impl Bucket {
    /// Value buckets in legend order (warmest first)
    pub const LEGEND: [Bucket; 9] = [
        Bucket::Above9,
        Bucket::Above6,
        Bucket::Above3,
        Bucket::Above0,
        Bucket::Zero,
        Bucket::Below0,
        Bucket::BelowMinus3,
        Bucket::BelowMinus6,
        Bucket::BelowMinus9,
    ];

    pub fn hex(&self) -> &'static str {
        match self {
            Bucket::Missing => "#cccccc",
            Bucket::Above9 => "#b35806",
            Bucket::Above6 => "#e08214",
            Bucket::Above3 => "#fdb863",
            Bucket::Above0 => "#fee0b6",
            Bucket::Zero => "#f7f7f7",
            Bucket::Below0 => "#d8daeb",
            Bucket::BelowMinus3 => "#b2abd2",
            Bucket::BelowMinus6 => "#8073ac",
            Bucket::BelowMinus9 => "#542788",
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Bucket::Missing => (0xcc, 0xcc, 0xcc),
            Bucket::Above9 => (0xb3, 0x58, 0x06),
            Bucket::Above6 => (0xe0, 0x82, 0x14),
            Bucket::Above3 => (0xfd, 0xb8, 0x63),
            Bucket::Above0 => (0xfe, 0xe0, 0xb6),
            Bucket::Zero => (0xf7, 0xf7, 0xf7),
            Bucket::Below0 => (0xd8, 0xda, 0xeb),
            Bucket::BelowMinus3 => (0xb2, 0xab, 0xd2),
            Bucket::BelowMinus6 => (0x80, 0x73, 0xac),
            Bucket::BelowMinus9 => (0x54, 0x27, 0x88),
        }
    }

    pub fn legend_label(&self) -> &'static str {
        match self {
            Bucket::Missing => "N/A",
            Bucket::Above9 => "> 9",
            Bucket::Above6 => "> 6",
            Bucket::Above3 => "> 3",
            Bucket::Above0 => "> 0",
            Bucket::Zero => "= 0",
            Bucket::Below0 => "< 0",
            Bucket::BelowMinus3 => "< -3",
            Bucket::BelowMinus6 => "< -6",
            Bucket::BelowMinus9 => "< -9",
        }
    }
}

/// Classify a ΔT value. Thresholds are checked top to bottom, first match wins.
/// NaN and infinities count as missing.
pub fn bucket_for(value: Option<f64>) -> Bucket {
    let value = match value {
        Some(v) if v.is_finite() => v,
        _ => return Bucket::Missing,
    };

    if value > 9.0 {
        Bucket::Above9
    } else if value > 6.0 {
        Bucket::Above6
    } else if value > 3.0 {
        Bucket::Above3
    } else if value > 0.0 {
        Bucket::Above0
    } else if value == 0.0 {
        Bucket::Zero
    } else if value > -3.0 {
        Bucket::Below0
    } else if value > -6.0 {
        Bucket::BelowMinus3
    } else if value > -9.0 {
        Bucket::BelowMinus6
    } else {
        Bucket::BelowMinus9
    }
}

/// Hex color token for a ΔT value
pub fn color_for(value: Option<f64>) -> &'static str {
    bucket_for(value).hex()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_value() {
        assert_eq!(color_for(None), "#cccccc");
        assert_eq!(color_for(Some(f64::NAN)), "#cccccc");
        assert_eq!(color_for(Some(f64::INFINITY)), "#cccccc");
    }

    #[test]
    fn test_boundaries_fall_on_the_lower_bucket() {
        assert_eq!(color_for(Some(9.0)), "#e08214");
        assert_eq!(color_for(Some(6.0)), "#fdb863");
        assert_eq!(color_for(Some(3.0)), "#fee0b6");
        assert_eq!(color_for(Some(0.0)), "#f7f7f7");
        assert_eq!(color_for(Some(-0.0)), "#f7f7f7");
        assert_eq!(color_for(Some(-3.0)), "#b2abd2");
        assert_eq!(color_for(Some(-6.0)), "#8073ac");
        assert_eq!(color_for(Some(-9.0)), "#542788");
    }

    #[test]
    fn test_interior_values() {
        assert_eq!(color_for(Some(12.5)), "#b35806");
        assert_eq!(color_for(Some(7.2)), "#e08214");
        assert_eq!(color_for(Some(4.0)), "#fdb863");
        assert_eq!(color_for(Some(0.001)), "#fee0b6");
        assert_eq!(color_for(Some(-0.001)), "#d8daeb");
        assert_eq!(color_for(Some(-4.5)), "#b2abd2");
        assert_eq!(color_for(Some(-8.9)), "#8073ac");
        assert_eq!(color_for(Some(-40.0)), "#542788");
        assert_eq!(color_for(Some(f64::INFINITY)), "#b35806");
        assert_eq!(color_for(Some(f64::NEG_INFINITY)), "#542788");
    }

    #[test]
    fn test_rgb_matches_hex() {
        for bucket in Bucket::LEGEND.iter().chain(std::iter::once(&Bucket::Missing)) {
            let (r, g, b) = bucket.rgb();
            assert_eq!(format!("#{:02x}{:02x}{:02x}", r, g, b), bucket.hex());
        }
    }

    #[test]
    fn test_legend_order() {
        let labels: Vec<_> = Bucket::LEGEND.iter().map(|b| b.legend_label()).collect();
        assert_eq!(labels, ["> 9", "> 6", "> 3", "> 0", "= 0", "< 0", "< -3", "< -6", "< -9"]);
        let colors: Vec<_> = Bucket::LEGEND.iter().map(|b| b.hex()).collect();
        assert_eq!(
            colors,
            ["#b35806", "#e08214", "#fdb863", "#fee0b6", "#f7f7f7", "#d8daeb", "#b2abd2", "#8073ac", "#542788"]
        );
    }
}
