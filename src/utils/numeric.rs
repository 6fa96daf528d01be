//! Преобразование чисел из скрипта в поля геометрии X11.
//! Значения вне диапазона поля насыщаются, а не отбрасываются.

pub fn saturating_i16(value: i64) -> i16 {
    value.clamp(i16::MIN as i64, i16::MAX as i64) as i16
}

pub fn saturating_u16(value: i64) -> u16 {
    value.clamp(0, u16::MAX as i64) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_values_pass_through() {
        assert_eq!(saturating_i16(-5), -5);
        assert_eq!(saturating_i16(100), 100);
        assert_eq!(saturating_u16(640), 640);
    }

    #[test]
    fn test_out_of_range_values_saturate() {
        assert_eq!(saturating_i16(40_000), i16::MAX);
        assert_eq!(saturating_i16(-40_000), i16::MIN);
        assert_eq!(saturating_u16(-1), 0);
        assert_eq!(saturating_u16(70_000), u16::MAX);
    }
}
