use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::commands::{self, CommandError};
use crate::core_state::CoreState;

/// Payload of every `update-*` channel: the row id next to the full field set.
#[derive(Debug, Deserialize)]
struct UpdatePayload<F> {
    id: i64,
    #[serde(flatten)]
    fields: F,
}

fn parse<T: DeserializeOwned>(channel: &str, payload: Value) -> Result<T, CommandError> {
    serde_json::from_value(payload)
        .map_err(|e| CommandError::bad_request(format!("Invalid payload for {channel}: {e}")))
}

fn reply<T: Serialize>(value: T) -> Result<Value, CommandError> {
    serde_json::to_value(value).map_err(|e| CommandError::internal(e.to_string()))
}

/// Route one request to its command and serialize the result.
pub fn dispatch(state: &CoreState, channel: &str, payload: Value) -> Result<Value, CommandError> {
    use commands::{
        allergy as al, appointment as ap, lab_result as lr, medical_history as mh,
        medication as md, patient as pt, records as rc, vital_signs as vs,
    };

    macro_rules! update {
        ($f:path) => {{
            let UpdatePayload { id, fields } = parse(channel, payload)?;
            reply($f(id, fields, state)?)
        }};
    }

    match channel {
        "health-check" => reply(commands::health_check()),

        "add-patient" => reply(pt::add_patient(parse(channel, payload)?, state)?),
        "get-patients" => reply(pt::get_patients(state)?),
        "get-patient" => reply(pt::get_patient(parse(channel, payload)?, state)?),
        "update-patient" => update!(pt::update_patient),
        "delete-patient" => reply(pt::delete_patient(parse(channel, payload)?, state)?),

        "add-appointment" => reply(ap::add_appointment(parse(channel, payload)?, state)?),
        "get-appointments" => reply(ap::get_appointments(state)?),
        "get-appointment" => reply(ap::get_appointment(parse(channel, payload)?, state)?),
        "update-appointment" => update!(ap::update_appointment),
        "delete-appointment" => reply(ap::delete_appointment(parse(channel, payload)?, state)?),

        "add-vital-signs" => reply(vs::add_vital_signs(parse(channel, payload)?, state)?),
        "get-vital-signs" => reply(vs::get_vital_signs(state)?),
        "get-vital-signs-by-id" => reply(vs::get_vital_signs_by_id(parse(channel, payload)?, state)?),
        "update-vital-signs" => update!(vs::update_vital_signs),
        "delete-vital-signs" => reply(vs::delete_vital_signs(parse(channel, payload)?, state)?),

        "add-lab-result" => reply(lr::add_lab_result(parse(channel, payload)?, state)?),
        "get-lab-results" => reply(lr::get_lab_results(state)?),
        "get-lab-result" => reply(lr::get_lab_result(parse(channel, payload)?, state)?),
        "update-lab-result" => update!(lr::update_lab_result),
        "delete-lab-result" => reply(lr::delete_lab_result(parse(channel, payload)?, state)?),

        "add-medical-history" => reply(mh::add_medical_history(parse(channel, payload)?, state)?),
        "get-medical-history" => reply(mh::get_medical_history(state)?),
        "get-medical-history-entry" => {
            reply(mh::get_medical_history_entry(parse(channel, payload)?, state)?)
        }
        "update-medical-history" => update!(mh::update_medical_history),
        "delete-medical-history" => {
            reply(mh::delete_medical_history(parse(channel, payload)?, state)?)
        }

        "add-allergy" => reply(al::add_allergy(parse(channel, payload)?, state)?),
        "get-allergies" => reply(al::get_allergies(state)?),
        "get-allergy" => reply(al::get_allergy(parse(channel, payload)?, state)?),
        "update-allergy" => update!(al::update_allergy),
        "delete-allergy" => reply(al::delete_allergy(parse(channel, payload)?, state)?),

        "add-medication" => reply(md::add_medication(parse(channel, payload)?, state)?),
        "get-medications" => reply(md::get_medications(state)?),
        "get-medication" => reply(md::get_medication(parse(channel, payload)?, state)?),
        "update-medication" => update!(md::update_medication),
        "delete-medication" => reply(md::delete_medication(parse(channel, payload)?, state)?),

        "get-patient-vitals" => reply(vs::get_patient_vitals(parse(channel, payload)?, state)?),
        "get-patient-history" => reply(mh::get_patient_history(parse(channel, payload)?, state)?),
        "get-patient-labs" => reply(lr::get_patient_labs(parse(channel, payload)?, state)?),
        "get-patient-medications" => {
            reply(md::get_patient_medications(parse(channel, payload)?, state)?)
        }
        "get-patient-allergies" => {
            reply(al::get_patient_allergies(parse(channel, payload)?, state)?)
        }
        "get-patient-appointments" => {
            reply(ap::get_patient_appointments(parse(channel, payload)?, state)?)
        }
        "get-patient-summary" => reply(rc::get_patient_summary(parse(channel, payload)?, state)?),
        "search" => reply(rc::search(parse(channel, payload)?, state)?),

        other => Err(CommandError::bad_request(format!("Unknown channel: {other}"))),
    }
}
