// Copyright 2024 The symexpr developers
// released under BSD 3-Clause License

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, ToPrimitive, Zero};
use std::fmt::{Debug, Display, Formatter};

/// This type restricts the maximum width that a bit-vector is allowed to have.
pub type WidthInt = u32;

/// The width of a boolean value.
pub const BOOL_WIDTH: WidthInt = 1;

/// A concrete bit-vector value of a fixed width. All arithmetic wraps at the
/// width; signed operations interpret the bit pattern as two's complement.
#[derive(PartialEq, Eq, Clone, Hash)]
pub struct BitVecValue {
    width: WidthInt,
    // invariant: bits < 2^width
    bits: BigUint,
}

fn mask(width: WidthInt) -> BigUint {
    (BigUint::one() << width as usize) - BigUint::one()
}

impl BitVecValue {
    pub fn from_big_uint(value: BigUint, width: WidthInt) -> Self {
        assert!(width > 0, "0-bit bitvectors are not allowed");
        Self {
            width,
            bits: value & mask(width),
        }
    }

    pub fn from_big_int(value: &BigInt, width: WidthInt) -> Self {
        let modulus = BigInt::one() << width as usize;
        let mut v = value % &modulus;
        if v.sign() == Sign::Minus {
            v += &modulus;
        }
        Self::from_big_uint(v.to_biguint().unwrap(), width)
    }

    pub fn from_u64(value: u64, width: WidthInt) -> Self {
        Self::from_big_uint(BigUint::from(value), width)
    }

    pub fn from_i64(value: i64, width: WidthInt) -> Self {
        Self::from_big_int(&BigInt::from(value), width)
    }

    pub fn from_bool(value: bool) -> Self {
        Self::from_u64(value as u64, BOOL_WIDTH)
    }

    pub fn zero(width: WidthInt) -> Self {
        Self::from_u64(0, width)
    }

    pub fn one(width: WidthInt) -> Self {
        Self::from_u64(1, width)
    }

    /// The all-ones pattern, i.e. `-1` in two's complement.
    pub fn ones(width: WidthInt) -> Self {
        Self {
            width,
            bits: mask(width),
        }
    }

    pub fn tru() -> Self {
        Self::from_bool(true)
    }

    pub fn fals() -> Self {
        Self::from_bool(false)
    }
}

/// Queries.
impl BitVecValue {
    pub fn width(&self) -> WidthInt {
        self.width
    }

    pub fn is_zero(&self) -> bool {
        self.bits.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.bits.is_one()
    }

    pub fn is_ones(&self) -> bool {
        self.bits == mask(self.width)
    }

    pub fn is_tru(&self) -> bool {
        self.width == BOOL_WIDTH && self.is_one()
    }

    pub fn is_fals(&self) -> bool {
        self.width == BOOL_WIDTH && self.is_zero()
    }

    /// Value of the sign bit.
    pub fn is_negative(&self) -> bool {
        ((&self.bits >> (self.width - 1) as usize) & BigUint::one()).is_one()
    }

    pub fn to_big_uint(&self) -> BigUint {
        self.bits.clone()
    }

    /// The two's complement reading of the bit pattern.
    pub fn to_big_int(&self) -> BigInt {
        if self.is_negative() {
            BigInt::from(self.bits.clone()) - (BigInt::one() << self.width as usize)
        } else {
            BigInt::from(self.bits.clone())
        }
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.bits.to_u64()
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.to_big_int().to_i64()
    }

    pub fn to_bool(&self) -> Option<bool> {
        match self.width {
            BOOL_WIDTH => Some(self.is_one()),
            _ => None,
        }
    }
}

/// Arithmetic. All operands of binary operations must share a width.
impl BitVecValue {
    fn binary(&self, rhs: &Self, bits: BigUint) -> Self {
        debug_assert_eq!(self.width, rhs.width);
        Self::from_big_uint(bits, self.width)
    }

    pub fn add(&self, rhs: &Self) -> Self {
        self.binary(rhs, &self.bits + &rhs.bits)
    }

    pub fn sub(&self, rhs: &Self) -> Self {
        // offset by 2^width to stay non-negative
        let bits = &self.bits + (BigUint::one() << self.width as usize) - &rhs.bits;
        self.binary(rhs, bits)
    }

    pub fn mul(&self, rhs: &Self) -> Self {
        self.binary(rhs, &self.bits * &rhs.bits)
    }

    pub fn negate(&self) -> Self {
        Self::from_big_uint(
            (BigUint::one() << self.width as usize) - &self.bits,
            self.width,
        )
    }

    /// Unsigned division. `x / 0` is all ones (SMT-LIB total semantics).
    pub fn udiv(&self, rhs: &Self) -> Self {
        if rhs.is_zero() {
            return Self::ones(self.width);
        }
        self.binary(rhs, &self.bits / &rhs.bits)
    }

    /// Unsigned remainder. `x % 0 = x`.
    pub fn urem(&self, rhs: &Self) -> Self {
        if rhs.is_zero() {
            return self.clone();
        }
        self.binary(rhs, &self.bits % &rhs.bits)
    }

    /// Signed division, truncating towards zero. `x / 0` is `1` for negative
    /// `x` and `-1` otherwise.
    pub fn sdiv(&self, rhs: &Self) -> Self {
        debug_assert_eq!(self.width, rhs.width);
        if rhs.is_zero() {
            return if self.is_negative() {
                Self::one(self.width)
            } else {
                Self::ones(self.width)
            };
        }
        Self::from_big_int(&(self.to_big_int() / rhs.to_big_int()), self.width)
    }

    /// Signed remainder, sign follows the dividend. `x % 0 = x`.
    pub fn srem(&self, rhs: &Self) -> Self {
        debug_assert_eq!(self.width, rhs.width);
        if rhs.is_zero() {
            return self.clone();
        }
        Self::from_big_int(&(self.to_big_int() % rhs.to_big_int()), self.width)
    }
}

/// Bitwise operations.
impl BitVecValue {
    pub fn not(&self) -> Self {
        Self {
            width: self.width,
            bits: &self.bits ^ mask(self.width),
        }
    }

    pub fn and(&self, rhs: &Self) -> Self {
        self.binary(rhs, &self.bits & &rhs.bits)
    }

    pub fn or(&self, rhs: &Self) -> Self {
        self.binary(rhs, &self.bits | &rhs.bits)
    }

    pub fn xor(&self, rhs: &Self) -> Self {
        self.binary(rhs, &self.bits ^ &rhs.bits)
    }

    /// Shift amounts are unsigned; amounts >= width shift everything out.
    pub fn shift_left(&self, rhs: &Self) -> Self {
        debug_assert_eq!(self.width, rhs.width);
        match rhs.to_u64() {
            Some(by) if by < self.width as u64 => {
                Self::from_big_uint(&self.bits << by as usize, self.width)
            }
            _ => Self::zero(self.width),
        }
    }

    pub fn shift_right(&self, rhs: &Self) -> Self {
        debug_assert_eq!(self.width, rhs.width);
        match rhs.to_u64() {
            Some(by) if by < self.width as u64 => {
                Self::from_big_uint(&self.bits >> by as usize, self.width)
            }
            _ => Self::zero(self.width),
        }
    }

    pub fn arithmetic_shift_right(&self, rhs: &Self) -> Self {
        debug_assert_eq!(self.width, rhs.width);
        let fill = if self.is_negative() {
            Self::ones(self.width)
        } else {
            Self::zero(self.width)
        };
        match rhs.to_u64() {
            Some(by) if by < self.width as u64 => {
                let kept = self.width as u64 - by;
                let low = &self.bits >> by as usize;
                let high = (fill.bits >> kept as usize) << kept as usize;
                Self::from_big_uint(low | high, self.width)
            }
            _ => fill,
        }
    }
}

/// Width changes.
impl BitVecValue {
    pub fn zero_extend(&self, to: WidthInt) -> Self {
        debug_assert!(to >= self.width);
        Self {
            width: to,
            bits: self.bits.clone(),
        }
    }

    pub fn sign_extend(&self, to: WidthInt) -> Self {
        debug_assert!(to >= self.width);
        if self.is_negative() {
            let high = (mask(to) >> self.width as usize) << self.width as usize;
            Self {
                width: to,
                bits: &self.bits | high,
            }
        } else {
            Self {
                width: to,
                bits: self.bits.clone(),
            }
        }
    }

    pub fn truncate(&self, to: WidthInt) -> Self {
        debug_assert!(to <= self.width);
        Self::from_big_uint(self.bits.clone(), to)
    }

    pub fn extract(&self, offset: WidthInt, width: WidthInt) -> Self {
        debug_assert!(offset + width <= self.width);
        Self::from_big_uint(&self.bits >> offset as usize, width)
    }

    /// `self` provides the high bits, `lo` the low bits.
    pub fn concat(&self, lo: &Self) -> Self {
        Self {
            width: self.width + lo.width,
            bits: (&self.bits << lo.width as usize) | &lo.bits,
        }
    }
}

/// Comparisons.
impl BitVecValue {
    pub fn is_equal(&self, rhs: &Self) -> bool {
        debug_assert_eq!(self.width, rhs.width);
        self.bits == rhs.bits
    }

    pub fn is_ult(&self, rhs: &Self) -> bool {
        debug_assert_eq!(self.width, rhs.width);
        self.bits < rhs.bits
    }

    pub fn is_ule(&self, rhs: &Self) -> bool {
        debug_assert_eq!(self.width, rhs.width);
        self.bits <= rhs.bits
    }

    pub fn is_slt(&self, rhs: &Self) -> bool {
        debug_assert_eq!(self.width, rhs.width);
        self.to_big_int() < rhs.to_big_int()
    }

    pub fn is_sle(&self, rhs: &Self) -> bool {
        debug_assert_eq!(self.width, rhs.width);
        self.to_big_int() <= rhs.to_big_int()
    }
}

impl Debug for BitVecValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "BitVecValue({self})")
    }
}

impl Display for BitVecValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.width <= 8 {
            write!(f, "{}'b{:b}", self.width, self.bits)
        } else {
            write!(f, "{}'x{:x}", self.width, self.bits)
        }
    }
}
