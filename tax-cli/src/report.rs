//! Human-readable rendering of a [`TaxResult`].

use std::fmt;

use rust_decimal::Decimal;
use tax_core::calculations::QuarterlyPayment;
use tax_core::TaxResult;

const LABEL_WIDTH: usize = 40;
const AMOUNT_WIDTH: usize = 16;

/// A plain-text summary of one result and its estimated-payment schedule.
///
/// Every field of the result appears in the output, followed by the full
/// breakdown. The self-employment and investment-income sections are shown
/// only when they are non-zero.
pub struct Summary<'a> {
    tax_year: i32,
    result: &'a TaxResult,
    schedule: &'a [QuarterlyPayment],
}

impl<'a> Summary<'a> {
    pub fn new(
        tax_year: i32,
        result: &'a TaxResult,
        schedule: &'a [QuarterlyPayment],
    ) -> Self {
        Self {
            tax_year,
            result,
            schedule,
        }
    }
}

impl fmt::Display for Summary<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let r = self.result;

        writeln!(f, "Tax summary for {} ({})", self.tax_year, r.state)?;

        section(f, "Income")?;
        line(f, "Gross income", &money(r.gross_income))?;
        line(f, "Adjustments", &money(r.adjustments))?;
        line(f, "Adjusted gross income", &money(r.agi))?;

        section(f, "Deductions")?;
        line(f, &format!("Deduction ({})", r.deduction_type), &money(r.deductions))?;
        line(f, "Taxable income", &money(r.taxable_income))?;

        section(f, "Federal income tax")?;
        line(f, "Ordinary income", &money(r.federal_tax_ordinary))?;
        line(f, "Long-term gains and qualified dividends", &money(r.federal_tax_ltcg))?;
        line(f, "Federal total", &money(r.federal_tax_total))?;
        line(f, "Marginal rate", &percent(r.marginal_rate))?;

        if !r.se_tax.is_zero() {
            section(f, "Self-employment")?;
            line(f, "Self-employment tax", &money(r.se_tax))?;
            line(f, "Deductible half", &money(r.se_deduction))?;
        }

        let niit = r.niit();
        if !niit.is_zero() {
            section(f, "Net investment income")?;
            line(f, "Net investment income tax", &money(niit))?;
        }

        section(f, "State")?;
        line(f, &format!("State tax ({})", r.state), &money(r.state_tax))?;

        section(f, "Credits")?;
        line(f, "Child tax credit", &money(r.child_tax_credit))?;
        line(f, "Education credits", &money(r.education_credits))?;
        line(f, "Total credits", &money(r.total_credits))?;

        section(f, "Totals")?;
        line(f, "Total tax", &money(r.total_tax))?;
        line(f, "Tax after credits", &money(r.tax_after_credits))?;
        line(f, "Effective rate", &percent(r.effective_rate))?;
        line(f, "Quarterly estimate", &money(r.quarterly_estimate))?;

        if !self.schedule.is_empty() {
            section(f, "Estimated payments")?;
            for payment in self.schedule {
                line(
                    f,
                    &format!("Q{} due {}", payment.quarter, payment.due_date.format("%b %-d, %Y")),
                    &money(payment.amount),
                )?;
            }
        }

        section(f, "Breakdown")?;
        for (category, amount) in &r.breakdown {
            line(f, category, &money(*amount))?;
        }

        Ok(())
    }
}

fn section(
    f: &mut fmt::Formatter<'_>,
    title: &str,
) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{title}")
}

fn line(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    value: &str,
) -> fmt::Result {
    writeln!(f, "  {label:<LABEL_WIDTH$}{value:>AMOUNT_WIDTH$}")
}

/// `$1,234.56`, with a leading minus for negative amounts.
pub fn money(amount: Decimal) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{cents}")
}

/// A rate already expressed in percent.
fn percent(rate: Decimal) -> String {
    format!("{rate}%")
}
