//! Plain-text facility export.

use crate::model::contact::ContactResponse;
use crate::model::facility::Facility;
use crate::model::well::WellRecord;

/// Renders one facility, its contact and its wells as a text document.
///
/// Absent values render as empty. The contact block is always present so
/// the layout stays stable for downstream parsers.
pub fn render_facility_export(
    facility: &Facility,
    contact: Option<&ContactResponse>,
    wells: &[WellRecord],
) -> String {
    let blank = ContactResponse::default();
    let contact = contact.unwrap_or(&blank);
    let text = |value: &Option<String>| value.clone().unwrap_or_default();

    let mut out = String::new();
    out.push_str(&format!("Facility ID: {}\n", facility.id));
    out.push_str(&format!("Facility Name: {}\n", facility.name));
    out.push_str(&format!("API Numbers: {}\n", facility.api_numbers_joined()));
    for (label, value) in [
        ("Name", &contact.name),
        ("Title", &contact.title),
        ("Company", &contact.company),
        ("Street", &contact.street),
        ("City", &contact.city),
        ("State", &contact.state),
        ("Zip", &contact.zip),
        ("Phone Number", &contact.phone_number),
        ("Email", &contact.email),
    ] {
        out.push_str(&format!("{label}: {}\n", text(value)));
    }
    out.push_str("\nRBDMS Well Data:\n");

    if wells.is_empty() {
        out.push_str("No RBDMS Well Data imported.\n");
        return out;
    }

    let number = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();
    for well in wells {
        out.push_str(&format!("\nAPI Number: {}\n", well.api_number));
        out.push_str(&format!("Well Name: {}\n", text(&well.well_name)));
        out.push_str(&format!("Well Num: {}\n", text(&well.well_num)));
        out.push_str(&format!("Operator: {}\n", text(&well.operator)));
        out.push_str(&format!("Sh Lat: {}\n", number(well.latitude)));
        out.push_str(&format!("Sh Lon: {}\n", number(well.longitude)));
        out.push_str(&format!("County: {}\n", text(&well.county)));
        out.push_str(&format!("Plss: {}\n", text(&well.plss)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn facility() -> Facility {
        Facility::with_id(
            Uuid::nil(),
            "North Pad",
            vec!["3505100001".into(), "3505100002".into()],
        )
    }

    #[test]
    fn empty_facility_reports_no_wells() {
        let text = render_facility_export(&facility(), None, &[]);
        assert!(text.starts_with(
            "Facility ID: 00000000-0000-0000-0000-000000000000\nFacility Name: North Pad\n"
        ));
        assert!(text.contains("API Numbers: 3505100001,3505100002\n"));
        assert!(text.contains("Email: \n"));
        assert!(text.ends_with("\nRBDMS Well Data:\nNo RBDMS Well Data imported.\n"));
    }

    #[test]
    fn wells_are_listed_in_order_with_blank_missing_values() {
        let mut first = WellRecord::new("3505100001");
        first.well_name = Some("Smith".into());
        first.latitude = Some(35.12346);
        first.plss = Some("S12 T5N R3W SWNE".into());
        let second = WellRecord::new("3505100002");

        let text = render_facility_export(&facility(), None, &[first, second]);
        let expected_tail = "RBDMS Well Data:\n\
            \nAPI Number: 3505100001\nWell Name: Smith\nWell Num: \nOperator: \n\
            Sh Lat: 35.12346\nSh Lon: \nCounty: \nPlss: S12 T5N R3W SWNE\n\
            \nAPI Number: 3505100002\nWell Name: \nWell Num: \nOperator: \n\
            Sh Lat: \nSh Lon: \nCounty: \nPlss: \n";
        assert!(text.ends_with(expected_tail), "got:\n{text}");
    }

    #[test]
    fn contact_fields_are_rendered() {
        let contact = ContactResponse {
            name: Some("Dana Reyes".into()),
            company: Some("Red Fork Midstream".into()),
            ..ContactResponse::default()
        };
        let text = render_facility_export(&facility(), Some(&contact), &[]);
        assert!(text.contains("Name: Dana Reyes\nTitle: \nCompany: Red Fork Midstream\n"));
    }
}
