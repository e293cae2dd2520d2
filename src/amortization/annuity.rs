//! Closed-form annuity functions for an ordinary (end-of-period) annuity
//!
//! Sign convention: `pv` is the amount borrowed and payments are returned
//! as positive numbers. The expressions are evaluated in the same order as
//! common spreadsheet/financial-library PMT, FV and IPMT implementations so
//! that flooring the results gives reproducible integers.

/// Compounding factor `(1 + rate)^nper`
pub fn growth_factor(rate: f64, nper: u32) -> f64 {
    (1.0 + rate).powf(nper as f64)
}

/// Level payment that amortizes `pv` over `nper` periods at `rate`
pub fn pmt(rate: f64, nper: u32, pv: f64) -> f64 {
    if nper == 0 {
        return 0.0;
    }

    let temp = growth_factor(rate, nper);
    let fact = (temp - 1.0) / rate;
    // Rates too small to move 1 + rate behave as zero
    if rate == 0.0 || fact == 0.0 {
        return pv / nper as f64;
    }
    pv * temp / fact
}

/// Balance outstanding after `nper` payments of `payment` on a loan of `pv`
pub fn fv(rate: f64, nper: u32, payment: f64, pv: f64) -> f64 {
    if rate == 0.0 {
        return pv - payment * nper as f64;
    }

    let temp = growth_factor(rate, nper);
    let fact = (temp - 1.0) / rate;
    pv * temp - payment * fact
}

/// Interest portion of payment number `per` (1-indexed)
pub fn ipmt(rate: f64, per: u32, nper: u32, pv: f64) -> f64 {
    if per == 0 || per > nper {
        return 0.0;
    }

    let payment = pmt(rate, nper, pv);
    fv(rate, per - 1, payment, pv) * rate
}

/// Principal portion of payment number `per` (1-indexed)
pub fn ppmt(rate: f64, per: u32, nper: u32, pv: f64) -> f64 {
    if per == 0 || per > nper {
        return 0.0;
    }
    pmt(rate, nper, pv) - ipmt(rate, per, nper, pv)
}
