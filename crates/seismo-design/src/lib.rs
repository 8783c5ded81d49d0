//! Seismo Design - digital IIR filter synthesis
//!
//! Builds recursive filters from a compact specification, in the manner of
//! the classic `mkfilter` program:
//!
//! 1. Analog low-pass prototype poles ([`Characteristic::Bessel`],
//!    [`Characteristic::Butterworth`], [`Characteristic::Chebyshev`]).
//! 2. Corner pre-warping for the bilinear transform.
//! 3. Low-pass to low/high/band-pass/band-stop frequency transform.
//! 4. S-plane to Z-plane mapping ([`Mapping::Bilinear`] or [`Mapping::MatchedZ`]).
//! 5. Polynomial expansion and recurrence coefficients.
//!
//! Resonators ([`Characteristic::Resonator`]) and proportional-integral
//! designs skip the analog stages and place their roots directly.
//!
//! # Example
//!
//! ```rust
//! use seismo_design::{Characteristic, DesignSpec, Recurrence, Response, design};
//!
//! let spec = DesignSpec::new(Characteristic::Chebyshev { ripple_db: -0.5 }, Response::Highpass, 200.0)
//!     .with_order(3)
//!     .with_corner(10.0);
//! let filter = design(&spec).unwrap();
//!
//! let mut runner = Recurrence::new(&filter);
//! let y = runner.process(1.0);
//! assert!(y.is_finite());
//! ```

pub mod design;
pub mod error;
pub mod paz;
mod prototype;
pub mod recurrence;
pub mod resonator;
pub mod spec;
mod transform;

pub use design::{FilterDesign, design};
pub use error::{DesignError, DesignWarning, Polynomial, Result};
pub use paz::{parse_paz, save_paz, to_paz_string, write_paz};
pub use recurrence::Recurrence;
pub use spec::{Characteristic, DesignSpec, MAX_ORDER, Mapping, Response};
