//! `INT.*` hooks: arbitrary-precision integer semantics.
//!
//! Every operand must be an `Int`; anything else (including `Bottom`) fails
//! with `InvalidArguments`. Results are always freshly allocated, except for
//! `max`/`min` which hand back one of their operands unchanged.

use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Pow, Signed, Zero};

use super::{HookError, HookRegistry};
use crate::term::{K, KLabel, Sort};

pub fn register(registry: &mut HookRegistry) {
  registry.register("INT.eq", eq);
  registry.register("INT.ne", ne);
  registry.register("INT.le", le);
  registry.register("INT.lt", lt);
  registry.register("INT.ge", ge);
  registry.register("INT.gt", gt);
  registry.register("INT.add", add);
  registry.register("INT.sub", sub);
  registry.register("INT.mul", mul);
  registry.register("INT.tdiv", tdiv);
  registry.register("INT.tmod", tmod);
  registry.register("INT.ediv", ediv);
  registry.register("INT.emod", emod);
  registry.register("INT.pow", pow);
  registry.register("INT.powmod", powmod);
  registry.register("INT.shl", shl);
  registry.register("INT.shr", shr);
  registry.register("INT.and", and);
  registry.register("INT.or", or);
  registry.register("INT.xor", xor);
  registry.register("INT.not", not);
  registry.register("INT.abs", abs);
  registry.register("INT.max", max);
  registry.register("INT.min", min);
  registry.register("INT.log2", log2);
  registry.register("INT.bitRange", bit_range);
  registry.register("INT.signExtendBitRange", sign_extend_bit_range);
  registry.register("INT.rand", rand);
  registry.register("INT.srand", srand);
}

// ============================================================================
// Operand extraction
// ============================================================================

fn int(k: &K) -> Result<&BigInt, HookError> {
  k.as_int().ok_or(HookError::InvalidArguments)
}

fn one_int(args: &[K]) -> Result<&BigInt, HookError> {
  let [a] = args else { return Err(HookError::InvalidArguments) };
  int(a)
}

fn two_ints(args: &[K]) -> Result<(&BigInt, &BigInt), HookError> {
  let [a, b] = args else { return Err(HookError::InvalidArguments) };
  Ok((int(a)?, int(b)?))
}

fn three_ints(args: &[K]) -> Result<(&BigInt, &BigInt, &BigInt), HookError> {
  let [a, b, c] = args else { return Err(HookError::InvalidArguments) };
  Ok((int(a)?, int(b)?, int(c)?))
}

/// A non-negative value that fits in 32 signed bits.
fn non_negative_i32(i: &BigInt) -> Option<u32> {
  i32::try_from(i).ok().and_then(|v| u32::try_from(v).ok())
}

fn shift_amount(i: &BigInt) -> Result<usize, HookError> {
  usize::try_from(i).map_err(|_| HookError::InvalidArguments)
}

// ============================================================================
// Comparison and ring operations
// ============================================================================

macro_rules! comparison_hook {
  ($name:ident, $op:tt) => {
    fn $name(
      args: &[K],
      _: &KLabel,
      _: &Sort,
      _: &K,
    ) -> Result<K, HookError> {
      let (a, b) = two_ints(args)?;
      Ok(K::bool(a $op b))
    }
  };
}

macro_rules! binary_hook {
  ($name:ident, $op:tt) => {
    fn $name(
      args: &[K],
      _: &KLabel,
      _: &Sort,
      _: &K,
    ) -> Result<K, HookError> {
      let (a, b) = two_ints(args)?;
      Ok(K::int(a $op b))
    }
  };
}

comparison_hook!(eq, ==);
comparison_hook!(ne, !=);
comparison_hook!(le, <=);
comparison_hook!(lt, <);
comparison_hook!(ge, >=);
comparison_hook!(gt, >);

binary_hook!(add, +);
binary_hook!(sub, -);
binary_hook!(mul, *);
binary_hook!(and, &);
binary_hook!(or, |);
binary_hook!(xor, ^);

// ============================================================================
// Division
// ============================================================================

/// Euclidean quotient and remainder: `a == q * b + r` with `0 <= r < |b|`.
/// `b` must be non-zero.
fn div_rem_euclid(a: &BigInt, b: &BigInt) -> (BigInt, BigInt) {
  let (q, r) = a.div_mod_floor(b);
  if r.is_negative() { (q + BigInt::one(), r - b) } else { (q, r) }
}

// Truncating division currently shares the Euclidean implementation.
fn tdiv(args: &[K], lbl: &KLabel, sort: &Sort, config: &K) -> Result<K, HookError> {
  ediv(args, lbl, sort, config)
}

fn tmod(args: &[K], lbl: &KLabel, sort: &Sort, config: &K) -> Result<K, HookError> {
  emod(args, lbl, sort, config)
}

fn ediv(args: &[K], _: &KLabel, _: &Sort, _: &K) -> Result<K, HookError> {
  let (a, b) = two_ints(args)?;
  if b.is_zero() {
    return Err(HookError::DivisionByZero);
  }
  Ok(K::int(div_rem_euclid(a, b).0))
}

fn emod(args: &[K], _: &KLabel, _: &Sort, _: &K) -> Result<K, HookError> {
  let (a, b) = two_ints(args)?;
  if b.is_zero() {
    return Err(HookError::DivisionByZero);
  }
  Ok(K::int(div_rem_euclid(a, b).1))
}

// ============================================================================
// Exponentiation
// ============================================================================

/// `base ^ exp`, with any non-positive exponent giving 1.
fn int_pow(base: &BigInt, exp: &BigInt) -> BigInt {
  if exp.sign() != Sign::Plus {
    return BigInt::one();
  }
  Pow::pow(base, exp.magnitude())
}

fn mod_inverse(a: &BigInt, modulus: &BigInt) -> Option<BigInt> {
  let egcd = a.extended_gcd(modulus);
  if !egcd.gcd.is_one() {
    return None;
  }
  Some(egcd.x.mod_floor(modulus))
}

fn pow(args: &[K], _: &KLabel, _: &Sort, _: &K) -> Result<K, HookError> {
  let (base, exp) = two_ints(args)?;
  Ok(K::int(int_pow(base, exp)))
}

/// Result lies in `[0, |m|)`. A zero modulus degrades to plain `pow`; a
/// negative exponent needs `base` to be invertible modulo `m`.
fn powmod(args: &[K], _: &KLabel, _: &Sort, _: &K) -> Result<K, HookError> {
  let (base, exp, m) = three_ints(args)?;
  if m.is_zero() {
    return Ok(K::int(int_pow(base, exp)));
  }
  let modulus = m.abs();
  let result = if exp.is_negative() {
    let inv = mod_inverse(base, &modulus).ok_or(HookError::InvalidArguments)?;
    inv.modpow(&-exp, &modulus)
  } else {
    base.modpow(exp, &modulus)
  };
  Ok(K::int(result))
}

// ============================================================================
// Bits
// ============================================================================

fn shl(args: &[K], _: &KLabel, _: &Sort, _: &K) -> Result<K, HookError> {
  let (a, n) = two_ints(args)?;
  let n = shift_amount(n)?;
  Ok(K::int(a << n))
}

fn shr(args: &[K], _: &KLabel, _: &Sort, _: &K) -> Result<K, HookError> {
  let (a, n) = two_ints(args)?;
  let n = shift_amount(n)?;
  Ok(K::int(a >> n))
}

fn not(args: &[K], _: &KLabel, _: &Sort, _: &K) -> Result<K, HookError> {
  let a = one_int(args)?;
  Ok(K::int(!a))
}

fn log2(args: &[K], _: &KLabel, _: &Sort, _: &K) -> Result<K, HookError> {
  let a = one_int(args)?;
  if a.sign() != Sign::Plus {
    return Err(HookError::InvalidArguments);
  }
  let bytes = a.magnitude().to_bytes_be();
  let leading_bits = 8 - bytes[0].leading_zeros() as usize;
  Ok(K::int(leading_bits + (bytes.len() - 1) * 8 - 1))
}

/// `length` bits of the two's-complement form of `x`, starting at bit
/// `offset`. Only whole bytes are supported.
fn bit_range(args: &[K], _: &KLabel, _: &Sort, _: &K) -> Result<K, HookError> {
  let (x, offset, length) = three_ints(args)?;
  if x.is_zero() {
    return Ok(K::zero());
  }
  let (Some(offset), Some(length)) =
    (non_negative_i32(offset), non_negative_i32(length))
  else {
    return Err(HookError::InvalidArguments);
  };
  if length == 0 {
    return Ok(K::zero());
  }
  if offset % 8 != 0 || length % 8 != 0 {
    return Err(HookError::NotImplemented);
  }
  let window = BigInt::one() << (offset as usize + length as usize);
  let truncated = x.mod_floor(&window);
  Ok(K::int(truncated >> offset as usize))
}

fn sign_extend_bit_range(
  _: &[K],
  _: &KLabel,
  _: &Sort,
  _: &K,
) -> Result<K, HookError> {
  Err(HookError::NotImplemented)
}

// ============================================================================
// Misc
// ============================================================================

fn abs(args: &[K], _: &KLabel, _: &Sort, _: &K) -> Result<K, HookError> {
  let a = one_int(args)?;
  Ok(K::int(a.abs()))
}

/// Returns the first operand on ties.
fn max(args: &[K], _: &KLabel, _: &Sort, _: &K) -> Result<K, HookError> {
  let [c1, c2] = args else { return Err(HookError::InvalidArguments) };
  if int(c1)? >= int(c2)? { Ok(c1.clone()) } else { Ok(c2.clone()) }
}

/// Returns the second operand on ties.
fn min(args: &[K], _: &KLabel, _: &Sort, _: &K) -> Result<K, HookError> {
  let [c1, c2] = args else { return Err(HookError::InvalidArguments) };
  if int(c1)? >= int(c2)? { Ok(c2.clone()) } else { Ok(c1.clone()) }
}

fn rand(_: &[K], _: &KLabel, _: &Sort, _: &K) -> Result<K, HookError> {
  Err(HookError::NotImplemented)
}

fn srand(_: &[K], _: &KLabel, _: &Sort, _: &K) -> Result<K, HookError> {
  Err(HookError::NotImplemented)
}

// ============================================================================
// Tests
// ============================================================================
