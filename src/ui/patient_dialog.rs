//! Patient record dialog.
//!
//! Four read-only sections: demographics, history, medications and
//! consultations. Each list entry becomes exactly one block; an empty list
//! renders no blocks.

use std::fmt::Write as _;

use crate::patient::{BasicInfo, Consultation, HistoryEntry, Medication, PatientInfo};

use super::html::{dialog, escape};

pub const DIALOG_ID: &str = "patient-details-dialog";
pub const DIALOG_TITLE: &str = "患者详细信息";

/// CSS class marking one history block.
pub const HISTORY_BLOCK: &str = "patient-history-entry";
/// CSS class marking one medication block.
pub const MEDICATION_BLOCK: &str = "patient-medication-entry";
/// CSS class marking one consultation block.
pub const CONSULTATION_BLOCK: &str = "patient-consultation-entry";

/// Render the full dialog for `info`.
#[must_use]
pub fn render_patient_dialog(info: &PatientInfo) -> String {
    let body = format!(
        r#"<div class="space-y-6">
{basic}
{history}
{medications}
{consultations}
</div>"#,
        basic = basic_section(&info.basic_info),
        history = section("既往病史", &blocks(&info.medical_history, history_block)),
        medications = section("用药情况", &blocks(&info.medications, medication_block)),
        consultations = section(
            "就诊记录",
            &blocks(&info.consultations, consultation_block)
        ),
    );
    dialog(DIALOG_ID, DIALOG_TITLE, "max-w-2xl", &body)
}

fn section(title: &str, inner: &str) -> String {
    format!(
        r#"<section>
    <h3 class="text-lg font-semibold mb-2">{title}</h3>
    <div class="space-y-2">{inner}</div>
</section>"#
    )
}

fn blocks<T>(items: &[T], render: fn(&T) -> String) -> String {
    items.iter().map(render).collect()
}

fn basic_section(b: &BasicInfo) -> String {
    let mut grid = String::new();
    let rows = [
        format!("姓名：{}", escape(&b.name)),
        format!("性别：{}", b.gender),
        format!("年龄：{}岁", b.age),
        format!("身高：{}cm", b.height),
        format!("体重：{}kg", b.weight),
        format!("血型：{}", escape(&b.blood_type)),
    ];
    for row in rows {
        let _ = write!(grid, "<div>{row}</div>");
    }
    format!(
        r#"<section>
    <h3 class="text-lg font-semibold mb-2">基本信息</h3>
    <div class="patient-basic-info grid grid-cols-2 gap-4 bg-muted p-4 rounded-lg">{grid}</div>
</section>"#
    )
}

fn history_block(h: &HistoryEntry) -> String {
    format!(
        r#"<div class="{HISTORY_BLOCK} bg-muted p-4 rounded-lg">
    <div class="font-medium">{condition}</div>
    <div class="text-sm text-muted-foreground">诊断日期：{date}</div>
    <div class="mt-2 text-sm">{details}</div>
</div>"#,
        condition = escape(&h.condition),
        date = escape(&h.diagnosis_date),
        details = escape(&h.details),
    )
}

fn medication_block(m: &Medication) -> String {
    format!(
        r#"<div class="{MEDICATION_BLOCK} bg-muted p-4 rounded-lg">
    <div class="font-medium">{name}</div>
    <div class="grid grid-cols-2 gap-2 mt-2 text-sm">
        <div>剂量：{dosage}</div>
        <div>频率：{frequency}</div>
        <div>开始日期：{start}</div>
    </div>
</div>"#,
        name = escape(&m.name),
        dosage = escape(&m.dosage),
        frequency = escape(&m.frequency),
        start = escape(&m.start_date),
    )
}

fn consultation_block(c: &Consultation) -> String {
    format!(
        r#"<div class="{CONSULTATION_BLOCK} bg-muted p-4 rounded-lg">
    <div class="flex justify-between items-center mb-2">
        <div class="font-medium">{date}</div>
        <div class="text-sm">{department} - {doctor}</div>
    </div>
    <div class="text-sm">
        <div>诊断：{diagnosis}</div>
        <div class="mt-1">处方：{prescription}</div>
    </div>
</div>"#,
        date = escape(&c.date),
        department = escape(&c.department),
        doctor = escape(&c.doctor),
        diagnosis = escape(&c.diagnosis),
        prescription = escape(&c.prescription),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patient::Gender;

    fn record(history: usize, meds: usize, consults: usize) -> PatientInfo {
        PatientInfo {
            basic_info: BasicInfo {
                name: "王五".into(),
                gender: Gender::Female,
                age: 62,
                height: 158.0,
                weight: 61.5,
                blood_type: "AB".into(),
            },
            medical_history: (0..history)
                .map(|i| HistoryEntry {
                    condition: format!("病症{i}"),
                    diagnosis_date: "2021-05-01".into(),
                    details: "稳定".into(),
                })
                .collect(),
            medications: (0..meds)
                .map(|i| Medication {
                    name: format!("药物{i}"),
                    dosage: "10mg".into(),
                    frequency: "每日两次".into(),
                    start_date: "2022-01-01".into(),
                })
                .collect(),
            consultations: (0..consults)
                .map(|i| Consultation {
                    date: format!("2023-0{}-15", i + 1),
                    doctor: "赵医生".into(),
                    department: "心内科".into(),
                    diagnosis: "复查正常".into(),
                    prescription: "继续用药".into(),
                })
                .collect(),
        }
    }

    fn count(html: &str, class: &str) -> usize {
        html.matches(&format!(r#"class="{class} "#)).count()
    }

    #[test]
    fn test_block_counts_match_lists() {
        for (h, m, c) in [(0, 0, 0), (1, 2, 3), (4, 0, 1)] {
            let html = render_patient_dialog(&record(h, m, c));
            assert_eq!(count(&html, HISTORY_BLOCK), h);
            assert_eq!(count(&html, MEDICATION_BLOCK), m);
            assert_eq!(count(&html, CONSULTATION_BLOCK), c);
        }
    }

    #[test]
    fn test_demographics_formatting() {
        let html = render_patient_dialog(&record(0, 0, 0));
        assert!(html.contains(DIALOG_TITLE));
        assert!(html.contains("姓名：王五"));
        assert!(html.contains("性别：女"));
        assert!(html.contains("年龄：62岁"));
        assert!(html.contains("身高：158cm"));
        assert!(html.contains("体重：61.5kg"));
        assert!(html.contains("血型：AB"));
    }

    #[test]
    fn test_record_text_is_escaped() {
        let mut info = record(1, 0, 0);
        info.medical_history[0].details = "<img src=x>".into();
        let html = render_patient_dialog(&info);
        assert!(html.contains("&lt;img src=x&gt;"));
        assert!(!html.contains("<img"));
    }
}
