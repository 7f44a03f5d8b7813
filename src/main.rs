use dynform::{FormUI, parse_form_config, values_to_json};
use serde_json::json;

type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() -> AppResult<()> {
    let payload = json!({
        "title": "Campus Pass Application",
        "description": "Apply for a transit, library, or facility pass.",
        "type": "pass_application",
        "sections": [
            {
                "title": "Personal Details",
                "fields": [
                    {"name": "full_name", "label": "Full Name", "type": "text", "required": true},
                    {"name": "email", "label": "Email", "type": "email", "required": true},
                    {"name": "phone_number", "label": "Phone Number", "type": "tel", "required": true},
                    {"name": "date_of_birth", "label": "Date of Birth", "type": "date", "required": false}
                ]
            },
            {
                "title": "Pass Details",
                "fields": [
                    {
                        "name": "pass_type",
                        "label": "Pass Type",
                        "type": "select",
                        "required": true,
                        "options": ["Transit", "Library", "Facility"]
                    },
                    {
                        "name": "application_kind",
                        "label": "Application Kind",
                        "type": "select",
                        "required": true,
                        "options": ["New", "Renewal", "Replacement"]
                    },
                    {
                        "name": "previous_pass_number",
                        "label": "Previous Pass Number",
                        "type": "text",
                        "required": false,
                        "show_if": {"application_kind": ["Renewal", "Replacement"]}
                    },
                    {
                        "name": "facility_name",
                        "label": "Facility Name",
                        "type": "text",
                        "required": true,
                        "show_if": {"pass_type": ["Facility"]}
                    }
                ]
            },
            {
                "title": "Documents",
                "fields": [
                    {
                        "name": "photo",
                        "label": "Passport Photo",
                        "type": "file",
                        "required": true,
                        "accept": ["image/*"]
                    },
                    {"name": "notes", "label": "Additional Notes", "type": "textarea", "required": false}
                ]
            }
        ]
    });

    let config = parse_form_config(&payload)?;
    let values = FormUI::new(config).with_title("dynform demo").run()?;

    println!("{}", serde_json::to_string_pretty(&values_to_json(&values))?);
    Ok(())
}
