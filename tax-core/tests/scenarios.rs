//! End-to-end checks against the reference scenarios and the engine's
//! invariants, using the built-in 2024 tables.

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tax_core::calculations::{
    CreditCalculator, SelfEmploymentTax, common::round_half_up, net_investment_income_tax,
    preferential_tax, progressive_tax,
};
use tax_core::{DeductionType, FilingStatus, TaxCalculator, TaxInput, TaxTables};

fn tables() -> TaxTables {
    TaxTables::tax_year_2024()
}

// =============================================================================
// Reference scenarios
// =============================================================================

#[test]
fn scenario_a_ordinary_tax_on_fifty_thousand() {
    let tables = tables();

    let result = progressive_tax(dec!(50000), tables.ordinary_brackets(FilingStatus::Single));

    assert_eq!(result.tax, dec!(6053));
    assert_eq!(result.marginal_rate, dec!(0.22));
}

#[test]
fn scenario_b_sixty_thousand_of_long_term_gains() {
    let tables = tables();

    let tax = preferential_tax(
        dec!(60000),
        dec!(0),
        dec!(60000),
        tables.preferential_brackets(FilingStatus::Single),
    );

    assert_eq!(tax, dec!(1946.25));
}

#[test]
fn scenario_c_self_employment_tax() {
    let tables = tables();

    let result = SelfEmploymentTax::new(&tables.self_employment).calculate(dec!(100000));

    assert_eq!(result.net_earnings, dec!(92350));
    assert_eq!(result.social_security_tax, dec!(11451.40));
    assert_eq!(result.medicare_tax, dec!(2678.15));
    assert_eq!(result.self_employment_tax, dec!(14129.55));
    assert_eq!(round_half_up(result.se_tax_deduction), dec!(7064.78));
}

#[test]
fn scenario_d_net_investment_income_tax() {
    let tables = tables();

    let niit =
        net_investment_income_tax(dec!(300000), dec!(50000), FilingStatus::Single, &tables.niit);

    assert_eq!(niit, dec!(1900));
}

#[test]
fn scenario_e_child_credit_phase_out() {
    let tables = tables();

    let credit = CreditCalculator::new(&tables.credits).child_tax_credit(
        2,
        0,
        dec!(250000),
        FilingStatus::Single,
    );

    assert_eq!(credit, dec!(1500));
}

// =============================================================================
// Full pipeline
// =============================================================================

#[test]
fn self_employed_couple_in_california() {
    let tables = tables();
    let calculator = TaxCalculator::new(&tables).unwrap();
    let input = TaxInput {
        self_employment: dec!(250000),
        interest: dec!(1500),
        dividends_qualified: dec!(5000),
        long_term_gains: dec!(25000),
        mortgage_interest: dec!(15000),
        property_tax: dec!(8000),
        charitable: dec!(5000),
        traditional_401k: dec!(23000),
        hsa: dec!(4150),
        children_under_17: 2,
        filing_status: FilingStatus::MarriedFilingJointly,
        state: "CA".to_string(),
        ..TaxInput::default()
    };

    let result = calculator.calculate(&input);

    // Net earnings 230,875: SS capped at 168,600, Medicare 2.9% plus 0.9%
    // above 200,000.
    assert_eq!(result.se_tax, dec!(27879.65));
    assert_eq!(result.se_deduction, dec!(13939.83));
    assert_eq!(result.gross_income, dec!(281500));
    assert_eq!(result.agi, dec!(263410.18));
    assert_eq!(result.deduction_type, DeductionType::Standard);
    assert_eq!(result.deductions, dec!(29200));
    assert_eq!(result.taxable_income, dec!(234210.18));
    assert_eq!(result.marginal_rate, dec!(24.0));
    assert_eq!(result.child_tax_credit, dec!(4000));
    assert_eq!(
        result.tax_after_credits,
        round_half_up(result.total_tax - result.total_credits)
    );
}

#[test]
fn qualifying_widow_uses_own_standard_deduction_and_single_brackets() {
    let tables = tables();
    let calculator = TaxCalculator::new(&tables).unwrap();
    let input = TaxInput {
        wages: dec!(79200),
        filing_status: FilingStatus::QualifyingSurvivingSpouse,
        state: "TX".to_string(),
        ..TaxInput::default()
    };

    let result = calculator.calculate(&input);

    assert_eq!(result.taxable_income, dec!(50000));
    assert_eq!(result.federal_tax_ordinary, dec!(6053));
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn ordinary_tax_is_monotonic_for_every_status() {
    let tables = tables();

    for status in FilingStatus::ALL {
        let brackets = tables.ordinary_brackets(status);
        let mut previous = progressive_tax(Decimal::ZERO, brackets).tax;
        assert_eq!(previous, Decimal::ZERO);

        for step in 1..=900 {
            let amount = Decimal::from(step) * dec!(999.99);
            let tax = progressive_tax(amount, brackets).tax;

            assert!(tax >= previous, "{status}: tax decreased at {amount}");
            previous = tax;
        }
    }
}

#[test]
fn preferential_tax_is_continuous_in_the_preferential_amount() {
    let tables = tables();
    let brackets = tables.preferential_brackets(FilingStatus::Single);
    let ordinary = dec!(30000);
    let cent = dec!(0.01);

    for step in 0..=6000 {
        let gains = Decimal::from(step) * dec!(100);
        let here = preferential_tax(gains, dec!(0), ordinary + gains, brackets);
        let next = preferential_tax(gains + cent, dec!(0), ordinary + gains + cent, brackets);

        // A cent more of gains can add at most a cent at the top rate.
        assert!(next >= here);
        assert!(next - here <= cent * dec!(0.20), "jump at {gains}");
    }
}

#[test]
fn clipped_values_are_never_negative() {
    let tables = tables();
    let calculator = TaxCalculator::new(&tables).unwrap();
    let inputs = [
        TaxInput::default(),
        TaxInput {
            rental_income: dec!(-40000),
            short_term_gains: dec!(-3000),
            ..TaxInput::default()
        },
        TaxInput {
            wages: dec!(30000),
            traditional_ira: dec!(7000),
            hsa: dec!(4150),
            children_under_17: 4,
            children_17_plus: 2,
            education_expenses: dec!(10000),
            ..TaxInput::default()
        },
        TaxInput {
            self_employment: dec!(-15000),
            long_term_gains: dec!(20000),
            medical: dec!(50000),
            filing_status: FilingStatus::HeadOfHousehold,
            ..TaxInput::default()
        },
    ];

    for input in &inputs {
        let result = calculator.calculate(input);

        assert!(result.taxable_income >= Decimal::ZERO);
        assert!(result.tax_after_credits >= Decimal::ZERO);
        assert!(result.deductions >= dec!(14600));
    }
}

#[test]
fn tables_are_shareable_across_threads() {
    let tables = tables();
    let calculator = TaxCalculator::new(&tables).unwrap();
    let input = TaxInput {
        wages: dec!(120000),
        ..TaxInput::default()
    };
    let expected = calculator.calculate(&input);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| calculator.calculate(&input)))
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
