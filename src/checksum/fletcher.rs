use super::Checksum;

/// 8 bit Fletcher sums (ck_a, ck_b) of the u-blox protocol,
/// from the class byte up to the end of payload.
pub struct Fletcher8;

impl Checksum for Fletcher8 {
    type Input = [u8];
    type Output = (u8, u8);

    fn compute(input: &[u8]) -> (u8, u8) {
        input.iter().fold((0u8, 0u8), |(ck_a, ck_b), byte| {
            let ck_a = ck_a.wrapping_add(*byte);
            (ck_a, ck_b.wrapping_add(ck_a))
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ack_ack() {
        // ACK-ACK (CFG-PRT)
        let span = [0x05, 0x01, 0x02, 0x00, 0x06, 0x01];
        assert_eq!(Fletcher8::compute(&span), (0x0f, 0x38));
        assert!(!Fletcher8::verify(&span, (0x38, 0x0f)));
    }
}
