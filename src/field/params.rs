//! Modulus-specific constants for the two prime fields used by the engine.
//!
//! Both fields share the generic Montgomery arithmetic in [`super`]; this
//! module only carries the constants that differ between them. All multi-limb
//! constants are 4 x u64 in little-endian limb order. Montgomery form stores
//! `a * R mod p` with `R = 2^256`.

/// Constants a prime field instantiation must supply.
///
/// `INV` is `-(p^-1) mod 2^64`, consumed by the interleaved Montgomery
/// reduction. `ROOT_OF_UNITY` is a generator of the order-`2^TWO_ADICITY`
/// subgroup, in Montgomery form, used by the Tonelli-Shanks square root.
/// The exponent constants are plain (non-Montgomery) integers.
pub trait FieldParams: 'static + Sized + Copy + Clone + Send + Sync {
    /// The prime modulus p.
    const MODULUS: [u64; 4];

    /// R mod p, the Montgomery encoding of one.
    const R: [u64; 4];

    /// R^2 mod p, used to convert into Montgomery form.
    const R2: [u64; 4];

    /// -(p^-1) mod 2^64.
    const INV: u64;

    /// Number of bits of the modulus.
    const NUM_BITS: u32;

    /// Largest s with 2^s dividing p - 1.
    const TWO_ADICITY: u32;

    /// g^t mod p in Montgomery form, where g is a quadratic non-residue and
    /// t = (p - 1) / 2^TWO_ADICITY.
    const ROOT_OF_UNITY: [u64; 4];

    /// (t - 1) / 2 with t as above.
    const T_MINUS_ONE_DIV_TWO: [u64; 4];

    /// (p - 1) / 2, the Legendre exponent.
    const MODULUS_MINUS_ONE_DIV_TWO: [u64; 4];
}

/// The Banderwagon base field: the BLS12-381 scalar prime.
///
/// p = 0x73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001
#[derive(Clone, Copy, Debug)]
pub struct BaseFieldParams;

impl FieldParams for BaseFieldParams {
    const MODULUS: [u64; 4] = [
        0xffffffff00000001,
        0x53bda402fffe5bfe,
        0x3339d80809a1d805,
        0x73eda753299d7d48,
    ];
    const R: [u64; 4] = [
        0x00000001fffffffe,
        0x5884b7fa00034802,
        0x998c4fefecbc4ff5,
        0x1824b159acc5056f,
    ];
    const R2: [u64; 4] = [
        0xc999e990f3f29c6d,
        0x2b6cedcb87925c23,
        0x05d314967254398f,
        0x0748d9d99f59ff11,
    ];
    const INV: u64 = 0xfffffffeffffffff;
    const NUM_BITS: u32 = 255;
    const TWO_ADICITY: u32 = 32;
    const ROOT_OF_UNITY: [u64; 4] = [
        0x9cab6d5c0c17f47c,
        0x1ce1e93dfd4b71e5,
        0x0d6db230471dd505,
        0x3f0ee990743a3b6a,
    ];
    const T_MINUS_ONE_DIV_TWO: [u64; 4] = [
        0x7fff2dff7fffffff,
        0x04d0ec02a9ded201,
        0x94cebea4199cec04,
        0x0000000039f6d3a9,
    ];
    const MODULUS_MINUS_ONE_DIV_TWO: [u64; 4] = [
        0x7fffffff80000000,
        0xa9ded2017fff2dff,
        0x199cec0404d0ec02,
        0x39f6d3a994cebea4,
    ];
}

/// The Banderwagon scalar field: the Bandersnatch subgroup order.
///
/// r = 0x1cfb69d4ca675f520cce760202687600ff8f87007419047174fd06b52876e7e1
#[derive(Clone, Copy, Debug)]
pub struct ScalarFieldParams;

impl FieldParams for ScalarFieldParams {
    const MODULUS: [u64; 4] = [
        0x74fd06b52876e7e1,
        0xff8f870074190471,
        0x0cce760202687600,
        0x1cfb69d4ca675f52,
    ];
    const R: [u64; 4] = [
        0x5817ca56bc48c0f8,
        0x0383c7fc5f37dc74,
        0x998c4fefecbc4ff8,
        0x1824b159acc5056f,
    ];
    const R2: [u64; 4] = [
        0xdbb4f5d658db47cb,
        0x40fa7ca27fecb938,
        0xaa9e6daec0055cea,
        0x0ae793ddb14aec7d,
    ];
    const INV: u64 = 0xf19f22295cc063df;
    const NUM_BITS: u32 = 253;
    const TWO_ADICITY: u32 = 5;
    const ROOT_OF_UNITY: [u64; 4] = [
        0x4b263b9a8d79c573,
        0xeadb3d0a007af1fd,
        0xa54c8a4668832589,
        0x0610860c4254fb9d,
    ];
    const T_MINUS_ONE_DIV_TWO: [u64; 4] = [
        0xc5d3f41ad4a1db9f,
        0x03fe3e1c01d06411,
        0x483339d80809a1d8,
        0x0073eda753299d7d,
    ];
    const MODULUS_MINUS_ONE_DIV_TWO: [u64; 4] = [
        0xba7e835a943b73f0,
        0x7fc7c3803a0c8238,
        0x06673b0101343b00,
        0x0e7db4ea6533afa9,
    ];
}
