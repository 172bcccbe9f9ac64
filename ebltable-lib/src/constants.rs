/// Speed of light in vacuum (m/s)
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Planck's constant (J·s)
pub const PLANCK: f64 = 6.626_070_15e-34;

/// Elementary charge (C), also the J per eV factor
pub const ELEMENTARY_CHARGE: f64 = 1.602_176_634e-19;

/// Planck's constant times speed of light (eV·µm)
pub const PLANCK_HC_EV_UM: f64 = PLANCK * SPEED_OF_LIGHT / ELEMENTARY_CHARGE * 1e6;

/// Microns per Ångström
pub const UM_PER_ANGSTROM: f64 = 1e-4;

/// Replacement for zero entries in tabulated intensities (nW m^-2 sr^-1)
pub const INTENSITY_FLOOR: f64 = 1e-20;
