use crate::engine::attendance::AttendanceCount;
use crate::engine::distribute::Tally;
use crate::engine::round2;
use crate::model::employee::EmployeeProfile;
use crate::model::payroll::PayoutLine;

/// Assemble the final payout line for one employee once the day loop is
/// done. This is the only place payroll money gets rounded: everything
/// upstream runs at full precision.
///
/// The daily rate divides the weekly component by a fixed 7 regardless
/// of how many days the salon actually opened; that is the business
/// rule, not an approximation.
pub fn build_line(profile: &EmployeeProfile, tally: Tally, count: AttendanceCount) -> PayoutLine {
    let employee = &profile.employee;

    let (weekly, bank, cash) = match profile.effective_contract() {
        Some(c) => {
            let (bank, cash) = c.split();
            (c.weekly_salary, bank, cash)
        }
        // No contract on file: the line shows $0 so the gap is visible.
        None => (0.0, 0.0, 0.0),
    };

    let unjustified = f64::from(count.unjustified);
    let bank_penalty = bank / 7.0 * unjustified;
    let cash_penalty = cash / 7.0 * unjustified;
    let payout_bank = round2((bank - bank_penalty).max(0.0));
    let payout_cash_salary = round2((cash - cash_penalty).max(0.0));

    let payout_commission = round2(tally.earned + tally.bonus);
    let total_cash = round2(payout_cash_salary + payout_commission);
    let total_payout = round2(payout_bank + payout_cash_salary + payout_commission);

    let note = build_note(employee_note_inputs(profile, &tally, &count));

    PayoutLine {
        employee_id: employee.id,
        employee_name: employee.display_name.clone(),
        pool: employee.pool,
        participation_pct: employee.participation_pct,
        days_worked: count.worked,
        days_absent_justified: count.justified,
        days_absent_unjustified: count.unjustified,
        weekly_salary: round2(weekly),
        bank_salary: round2(bank),
        cash_salary: round2(cash),
        bank_penalty: round2(bank_penalty),
        cash_penalty: round2(cash_penalty),
        payout_bank,
        payout_cash_salary,
        commission_earned: round2(tally.earned),
        bonus: round2(tally.bonus),
        commission_lost: round2(tally.lost),
        payout_commission,
        total_cash,
        total_payout,
        note,
    }
}

struct NoteInputs {
    unjustified: u32,
    justified: u32,
    bonus: f64,
    participation_pct: f64,
    pool: String,
}

fn employee_note_inputs(profile: &EmployeeProfile, tally: &Tally, count: &AttendanceCount) -> NoteInputs {
    NoteInputs {
        unjustified: count.unjustified,
        justified: count.justified,
        bonus: tally.bonus,
        participation_pct: profile.employee.participation_pct,
        pool: profile.employee.pool.to_string(),
    }
}

fn build_note(n: NoteInputs) -> String {
    let pct = if n.participation_pct.fract() == 0.0 {
        format!("{:.0}", n.participation_pct)
    } else {
        format!("{:.1}", n.participation_pct)
    };
    let mut note = format!(
        "{} unjustified, {} justified absence(s)",
        n.unjustified, n.justified
    );
    if n.bonus > 0.0 {
        note.push_str(&format!("; bonus ${:.2}", round2(n.bonus)));
    }
    note.push_str(&format!("; {}% of {} pool", pct, n.pool));
    note
}
