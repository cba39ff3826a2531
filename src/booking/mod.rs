//! Slot booking, cancellation and completion.
//!
//! Every mutation of a doctor's slot map happens inside one transaction that
//! first takes a row lock (`SELECT ... FOR UPDATE`) on the doctor. Concurrent
//! bookings and cancellations for the same doctor are therefore serialized,
//! and the appointment write and the slot-map write commit or roll back
//! together.

pub mod dashboard;

use chrono::Utc;
use diesel::{mysql::Mysql, prelude::*};

use crate::{
    context::{Identity, RequestContext},
    error::AppError,
    models::{
        appointments::{Appointment, NewAppointment},
        doctors::DoctorData,
        users::UserData,
    },
};

fn lock_doctor(conn: &MysqlConnection, did: &str) -> Result<DoctorData, AppError> {
    use crate::schema::doctors;

    doctors::table
        .filter(doctors::did.eq(did))
        .for_update()
        .get_result::<DoctorData>(conn)
        .optional()?
        .ok_or(AppError::NotFound("Doctor"))
}

fn find_appointment(conn: &MysqlConnection, aid: &str) -> Result<Appointment, AppError> {
    use crate::schema::appointments;

    appointments::table
        .filter(appointments::aid.eq(aid))
        .get_result::<Appointment>(conn)
        .optional()?
        .ok_or(AppError::NotFound("Appointment"))
}

/// Whether `identity` may act on `appointment`. Admins may act on any.
pub fn owns(identity: &Identity, appointment: &Appointment) -> bool {
    match identity {
        Identity::Patient(uid) => *uid == appointment.user_id,
        Identity::Doctor(did) => *did == appointment.doc_id,
        Identity::Admin(_) => true,
    }
}

pub fn book_appointment(
    conn: &MysqlConnection,
    ctx: &RequestContext,
    doc_id: &str,
    slot_date: &str,
    slot_time: &str,
) -> Result<Appointment, AppError> {
    use crate::schema::{appointments, doctors, users};

    let uid = ctx.patient_id()?;
    crate::utils::assert_slot(slot_date, slot_time)?;

    conn.transaction(|| {
        let doctor = match lock_doctor(conn, doc_id) {
            Ok(doctor) => doctor,
            Err(AppError::NotFound(_)) => {
                log::warn!("Booking rejected, doctor {} does not exist", doc_id);
                return Err(AppError::DoctorUnavailable);
            }
            Err(err) => return Err(err),
        };
        if !doctor.available {
            log::warn!("Booking rejected, doctor {} is not available", doctor.did);
            return Err(AppError::DoctorUnavailable);
        }

        let mut slots = doctor.slot_map()?;
        if let Err(err) = slots.reserve(slot_date, slot_time) {
            log::warn!(
                "Booking rejected, doctor {} already has {} {}",
                doctor.did,
                slot_date,
                slot_time
            );
            return Err(err);
        }

        let user = users::table
            .filter(users::uid.eq(uid))
            .get_result::<UserData>(conn)
            .optional()?
            .ok_or(AppError::NotFound("User"))?;

        let data = NewAppointment {
            aid: crate::utils::new_id(),
            user_id: user.uid.clone(),
            doc_id: doctor.did.clone(),
            slot_date: slot_date.to_string(),
            slot_time: slot_time.to_string(),
            user_data: serde_json::to_string(&user.profile()?)?,
            doc_data: serde_json::to_string(&doctor.profile()?)?,
            amount: doctor.fees,
            created_at: Utc::now().naive_utc(),
        };
        diesel::insert_into(appointments::table)
            .values(&data)
            .execute(conn)?;

        diesel::update(doctors::table.filter(doctors::did.eq(&doctor.did)))
            .set(doctors::slots_booked.eq(slots.to_json()?))
            .execute(conn)?;

        log::info!(
            "Appointment {} booked: user {} with doctor {} at {} {}",
            data.aid,
            data.user_id,
            data.doc_id,
            slot_date,
            slot_time
        );
        find_appointment(conn, &data.aid)
    })
}

/// Cancels an appointment on behalf of its patient, its doctor or an admin, and
/// gives the slot back to the doctor.
///
/// Cancelling an appointment that is already cancelled succeeds without
/// touching the slot map, since the slot may have been booked again.
pub fn cancel_appointment(
    conn: &MysqlConnection,
    ctx: &RequestContext,
    aid: &str,
) -> Result<(), AppError> {
    use crate::schema::{appointments, doctors};

    let appointment = match (find_appointment(conn, aid), &ctx.identity) {
        (Err(AppError::NotFound(_)), Identity::Doctor(_)) => {
            return Err(AppError::Unauthorized("Cancellation Failed".to_string()))
        }
        (res, _) => res?,
    };
    if !owns(&ctx.identity, &appointment) {
        log::warn!("{:?} may not cancel appointment {}", ctx.identity, aid);
        return Err(match ctx.identity {
            Identity::Doctor(_) => AppError::Unauthorized("Cancellation Failed".to_string()),
            _ => AppError::unauthorized(),
        });
    }

    conn.transaction(|| {
        let doctor = lock_doctor(conn, &appointment.doc_id)?;
        let appointment = appointments::table
            .filter(appointments::aid.eq(aid))
            .for_update()
            .get_result::<Appointment>(conn)?;
        if appointment.cancelled {
            log::info!("Appointment {} was already cancelled", aid);
            return Ok(());
        }

        diesel::update(appointments::table.filter(appointments::aid.eq(aid)))
            .set(appointments::cancelled.eq(true))
            .execute(conn)?;

        let mut slots = doctor.slot_map()?;
        if slots.release(&appointment.slot_date, &appointment.slot_time) {
            diesel::update(doctors::table.filter(doctors::did.eq(&doctor.did)))
                .set(doctors::slots_booked.eq(slots.to_json()?))
                .execute(conn)?;
        }

        log::info!(
            "Appointment {} cancelled, doctor {} released {} {}",
            aid,
            doctor.did,
            appointment.slot_date,
            appointment.slot_time
        );
        Ok(())
    })
}

/// Marks an appointment done. The slot stays consumed.
pub fn complete_appointment(
    conn: &MysqlConnection,
    ctx: &RequestContext,
    aid: &str,
) -> Result<(), AppError> {
    use crate::schema::appointments;

    let did = ctx.doctor_id()?;
    let appointment = match find_appointment(conn, aid) {
        Ok(appointment) => appointment,
        Err(AppError::NotFound(_)) => return Err(AppError::Unauthorized("Mark Failed".to_string())),
        Err(err) => return Err(err),
    };
    if appointment.doc_id != did {
        log::warn!("Doctor {} may not complete appointment {}", did, aid);
        return Err(AppError::Unauthorized("Mark Failed".to_string()));
    }

    diesel::update(appointments::table.filter(appointments::aid.eq(aid)))
        .set(appointments::is_completed.eq(true))
        .execute(conn)?;

    log::info!("Appointment {} completed by doctor {}", aid, did);
    Ok(())
}

/// The patient's own appointment, provided it can still be paid for.
pub fn payable_appointment(
    conn: &MysqlConnection,
    ctx: &RequestContext,
    aid: &str,
) -> Result<Appointment, AppError> {
    let uid = ctx.patient_id()?;
    match find_appointment(conn, aid) {
        Ok(appointment) if appointment.user_id == uid && !appointment.cancelled => Ok(appointment),
        Ok(appointment) if appointment.user_id != uid => Err(AppError::unauthorized()),
        Ok(_) | Err(AppError::NotFound(_)) => Err(AppError::invalid(
            "Appointment Cancelled or Not Found",
        )),
        Err(err) => Err(err),
    }
}

/// Opening a checkout for an appointment that is already paid would charge twice.
pub fn ensure_unpaid(appointment: &Appointment) -> Result<(), AppError> {
    if appointment.payment {
        return Err(AppError::invalid("Appointment Already Paid"));
    }
    Ok(())
}

pub fn mark_paid(conn: &MysqlConnection, aid: &str) -> Result<(), AppError> {
    use crate::schema::appointments;

    diesel::update(appointments::table.filter(appointments::aid.eq(aid)))
        .set(appointments::payment.eq(true))
        .execute(conn)?;

    log::info!("Appointment {} paid", aid);
    Ok(())
}

/// Appointments visible to `identity`, in booking order.
pub fn list_appointments(
    conn: &MysqlConnection,
    identity: &Identity,
) -> Result<Vec<Appointment>, AppError> {
    use crate::schema::appointments;

    let mut query: appointments::BoxedQuery<Mysql> = appointments::table
        .order(appointments::seq.asc())
        .into_boxed();
    match identity {
        Identity::Patient(uid) => query = query.filter(appointments::user_id.eq(uid.as_str())),
        Identity::Doctor(did) => query = query.filter(appointments::doc_id.eq(did.as_str())),
        Identity::Admin(_) => {}
    }

    Ok(query.load::<Appointment>(conn)?)
}

/// Flips the doctor's `available` flag and returns the new value.
pub fn change_availability(conn: &MysqlConnection, did: &str) -> Result<bool, AppError> {
    use crate::schema::doctors;

    conn.transaction(|| {
        let doctor = lock_doctor(conn, did)?;
        let available = !doctor.available;
        diesel::update(doctors::table.filter(doctors::did.eq(did)))
            .set(doctors::available.eq(available))
            .execute(conn)?;

        log::info!("Doctor {} availability set to {}", did, available);
        Ok(available)
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        config::Config,
        models::{address::Address, slots::SlotMap},
        schema::{appointments, doctors, users},
    };
    use actix_web::web;
    use std::{
        sync::{Arc, Barrier},
        thread,
    };

    pub fn test_config() -> web::Data<Config> {
        web::Data::new(Config {
            database_url: String::new(),
            bind: "127.0.0.1:0".to_string(),
            login_expire_secs: 3600,
            admin_email: "admin@docbook.dev".to_string(),
            admin_password: "qwerty123".to_string(),
            stripe_key: None,
            currency: "usd".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
        })
    }

    fn ctx(identity: Identity) -> RequestContext {
        RequestContext::new(identity, test_config())
    }

    fn sample_appointment(user_id: &str, doc_id: &str) -> Appointment {
        Appointment {
            aid: "a-1".to_string(),
            seq: 1,
            user_id: user_id.to_string(),
            doc_id: doc_id.to_string(),
            slot_date: "2024-05-01".to_string(),
            slot_time: "10:00".to_string(),
            user_data: "{}".to_string(),
            doc_data: "{}".to_string(),
            amount: 50,
            created_at: Utc::now().naive_utc(),
            cancelled: false,
            payment: false,
            is_completed: false,
        }
    }

    #[test]
    fn ownership_by_role() {
        let appointment = sample_appointment("user-a", "doc-x");

        assert!(owns(&Identity::Patient("user-a".to_string()), &appointment));
        assert!(!owns(&Identity::Patient("user-b".to_string()), &appointment));
        assert!(owns(&Identity::Doctor("doc-x".to_string()), &appointment));
        assert!(!owns(&Identity::Doctor("doc-y".to_string()), &appointment));
        assert!(owns(&Identity::Admin("admin@docbook.dev".to_string()), &appointment));
    }

    #[test]
    fn only_patients_can_book() {
        // Rejected before any query is issued.
        let ctx = ctx(Identity::Doctor("doc-x".to_string()));
        assert!(matches!(ctx.patient_id(), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn paid_appointment_cannot_be_paid_again() {
        let mut appointment = sample_appointment("user-a", "doc-x");
        assert!(ensure_unpaid(&appointment).is_ok());

        appointment.payment = true;
        assert_eq!(
            ensure_unpaid(&appointment).unwrap_err().to_string(),
            "Appointment Already Paid"
        );
    }

    // The tests below need a migrated MySQL database:
    // TEST_DATABASE_URL=mysql://... cargo test -- --ignored

    fn test_conn() -> MysqlConnection {
        let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL not set");
        let conn = MysqlConnection::establish(&url).expect("Failed to connect");
        conn.begin_test_transaction().expect("Failed to begin test transaction");
        conn
    }

    fn insert_user(conn: &MysqlConnection, name: &str) -> String {
        let uid = crate::utils::new_id();
        diesel::insert_into(users::table)
            .values(UserData {
                uid: uid.clone(),
                name: name.to_string(),
                email: format!("{}@example.com", uid),
                password: crate::utils::hash_password("qwerty123").unwrap(),
                image: String::new(),
                phone: "000000000".to_string(),
                address: Address::default().to_json().unwrap(),
                gender: "Not Selected".to_string(),
                dob: "Not Selected".to_string(),
            })
            .execute(conn)
            .unwrap();
        uid
    }

    fn insert_doctor(conn: &MysqlConnection, available: bool) -> String {
        let did = crate::utils::new_id();
        diesel::insert_into(doctors::table)
            .values(DoctorData {
                did: did.clone(),
                name: "Dr. Richard James".to_string(),
                email: format!("{}@example.com", did),
                password: crate::utils::hash_password("qwerty123").unwrap(),
                image: String::new(),
                speciality: "General physician".to_string(),
                degree: "MBBS".to_string(),
                experience: "4 Years".to_string(),
                about: String::new(),
                available,
                fees: 50,
                address: Address::default().to_json().unwrap(),
                created_at: Utc::now().naive_utc(),
                slots_booked: SlotMap::new().to_json().unwrap(),
            })
            .execute(conn)
            .unwrap();
        did
    }

    fn slots_of(conn: &MysqlConnection, did: &str) -> SlotMap {
        doctors::table
            .filter(doctors::did.eq(did))
            .get_result::<DoctorData>(conn)
            .unwrap()
            .slot_map()
            .unwrap()
    }

    #[test]
    #[ignore]
    fn book_conflict_cancel_rebook() {
        let conn = test_conn();
        let uid = insert_user(&conn, "Alice");
        let did = insert_doctor(&conn, true);
        let patient = ctx(Identity::Patient(uid.clone()));

        let first = book_appointment(&conn, &patient, &did, "2024-05-01", "10:00").unwrap();
        assert_eq!(first.amount, 50);
        assert_eq!(
            slots_of(&conn, &did).to_json().unwrap(),
            r#"{"2024-05-01":["10:00"]}"#
        );

        let again = book_appointment(&conn, &patient, &did, "2024-05-01", "10:00");
        assert!(matches!(again, Err(AppError::SlotConflict)));

        cancel_appointment(&conn, &patient, &first.aid).unwrap();
        assert_eq!(
            slots_of(&conn, &did).to_json().unwrap(),
            r#"{"2024-05-01":[]}"#
        );

        let rebooked = book_appointment(&conn, &patient, &did, "2024-05-01", "10:00").unwrap();
        assert_ne!(rebooked.aid, first.aid);
        assert!(slots_of(&conn, &did).is_booked("2024-05-01", "10:00"));
    }

    #[test]
    #[ignore]
    fn unavailable_doctor_rejects_booking() {
        let conn = test_conn();
        let uid = insert_user(&conn, "Alice");
        let did = insert_doctor(&conn, false);

        let res = book_appointment(
            &conn,
            &ctx(Identity::Patient(uid)),
            &did,
            "2024-05-01",
            "10:00",
        );
        assert!(matches!(res, Err(AppError::DoctorUnavailable)));
        assert_eq!(slots_of(&conn, &did), SlotMap::new());
    }

    #[test]
    #[ignore]
    fn unknown_doctor_reads_as_unavailable() {
        let conn = test_conn();
        let uid = insert_user(&conn, "Alice");

        let res = book_appointment(
            &conn,
            &ctx(Identity::Patient(uid)),
            "missing",
            "2024-05-01",
            "10:00",
        );
        assert!(matches!(res, Err(AppError::DoctorUnavailable)));
    }

    #[test]
    #[ignore]
    fn doctor_actions_on_missing_appointment() {
        let conn = test_conn();
        let doctor = ctx(Identity::Doctor(insert_doctor(&conn, true)));

        assert_eq!(
            complete_appointment(&conn, &doctor, "missing")
                .unwrap_err()
                .to_string(),
            "Mark Failed"
        );
        assert_eq!(
            cancel_appointment(&conn, &doctor, "missing")
                .unwrap_err()
                .to_string(),
            "Cancellation Failed"
        );

        let patient = ctx(Identity::Patient(insert_user(&conn, "Alice")));
        assert!(matches!(
            cancel_appointment(&conn, &patient, "missing"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    #[ignore]
    fn foreign_cancel_is_rejected_and_changes_nothing() {
        let conn = test_conn();
        let alice = insert_user(&conn, "Alice");
        let bob = insert_user(&conn, "Bob");
        let did = insert_doctor(&conn, true);

        let booked =
            book_appointment(&conn, &ctx(Identity::Patient(bob)), &did, "2024-05-01", "10:00")
                .unwrap();

        let res = cancel_appointment(&conn, &ctx(Identity::Patient(alice)), &booked.aid);
        assert!(matches!(res, Err(AppError::Unauthorized(_))));

        let other_doctor = insert_doctor(&conn, true);
        let res = cancel_appointment(&conn, &ctx(Identity::Doctor(other_doctor)), &booked.aid);
        assert!(matches!(res, Err(AppError::Unauthorized(_))));

        assert!(!find_appointment(&conn, &booked.aid).unwrap().cancelled);
        assert!(slots_of(&conn, &did).is_booked("2024-05-01", "10:00"));
    }

    #[test]
    #[ignore]
    fn second_cancel_leaves_rebooked_slot_alone() {
        let conn = test_conn();
        let alice = insert_user(&conn, "Alice");
        let bob = insert_user(&conn, "Bob");
        let did = insert_doctor(&conn, true);
        let alice = ctx(Identity::Patient(alice));

        let first = book_appointment(&conn, &alice, &did, "2024-05-01", "10:00").unwrap();
        cancel_appointment(&conn, &alice, &first.aid).unwrap();
        book_appointment(&conn, &ctx(Identity::Patient(bob)), &did, "2024-05-01", "10:00")
            .unwrap();

        cancel_appointment(&conn, &alice, &first.aid).unwrap();
        assert!(slots_of(&conn, &did).is_booked("2024-05-01", "10:00"));
    }

    #[test]
    #[ignore]
    fn doctor_cancel_and_complete() {
        let conn = test_conn();
        let uid = insert_user(&conn, "Alice");
        let did = insert_doctor(&conn, true);
        let patient = ctx(Identity::Patient(uid));
        let doctor = ctx(Identity::Doctor(did.clone()));

        let first = book_appointment(&conn, &patient, &did, "2024-05-01", "10:00").unwrap();
        let second = book_appointment(&conn, &patient, &did, "2024-05-01", "11:00").unwrap();

        cancel_appointment(&conn, &doctor, &first.aid).unwrap();
        assert!(!slots_of(&conn, &did).is_booked("2024-05-01", "10:00"));

        let stranger = ctx(Identity::Doctor(insert_doctor(&conn, true)));
        assert!(matches!(
            complete_appointment(&conn, &stranger, &second.aid),
            Err(AppError::Unauthorized(_))
        ));

        complete_appointment(&conn, &doctor, &second.aid).unwrap();
        assert!(find_appointment(&conn, &second.aid).unwrap().is_completed);
        assert!(slots_of(&conn, &did).is_booked("2024-05-01", "11:00"));
    }

    #[test]
    #[ignore]
    fn snapshot_is_decoupled_from_later_fee_changes() {
        let conn = test_conn();
        let uid = insert_user(&conn, "Alice");
        let did = insert_doctor(&conn, true);

        let booked =
            book_appointment(&conn, &ctx(Identity::Patient(uid)), &did, "2024-05-01", "10:00")
                .unwrap();
        diesel::update(doctors::table.filter(doctors::did.eq(&did)))
            .set(doctors::fees.eq(80))
            .execute(&conn)
            .unwrap();

        let stored = find_appointment(&conn, &booked.aid).unwrap();
        assert_eq!(stored.amount, 50);
        assert_eq!(stored.to_item().unwrap().doc_data.fees, 50);
    }

    #[test]
    #[ignore]
    fn availability_toggles() {
        let conn = test_conn();
        let did = insert_doctor(&conn, true);

        assert!(!change_availability(&conn, &did).unwrap());
        assert!(change_availability(&conn, &did).unwrap());
        assert!(matches!(
            change_availability(&conn, "missing"),
            Err(AppError::NotFound(_))
        ));
    }

    // Commits for real: each booking needs its own connection, so a test
    // transaction cannot be used. Rows are removed before asserting.
    #[test]
    #[ignore]
    fn racing_bookings_for_one_slot_admit_exactly_one() {
        let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL not set");
        let setup = MysqlConnection::establish(&url).expect("Failed to connect");
        let patients = vec![insert_user(&setup, "Alice"), insert_user(&setup, "Bob")];
        let did = insert_doctor(&setup, true);

        let barrier = Arc::new(Barrier::new(patients.len()));
        let handles: Vec<_> = patients
            .iter()
            .cloned()
            .map(|uid| {
                let url = url.clone();
                let did = did.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    let conn = MysqlConnection::establish(&url).expect("Failed to connect");
                    let patient = ctx(Identity::Patient(uid));
                    barrier.wait();
                    book_appointment(&conn, &patient, &did, "2024-05-01", "10:00")
                })
            })
            .collect();
        let results: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().expect("booking thread panicked"))
            .collect();

        let booked = slots_of(&setup, &did).slots_on("2024-05-01").len();

        diesel::delete(appointments::table.filter(appointments::doc_id.eq(&did)))
            .execute(&setup)
            .unwrap();
        diesel::delete(doctors::table.filter(doctors::did.eq(&did)))
            .execute(&setup)
            .unwrap();
        diesel::delete(users::table.filter(users::uid.eq_any(&patients)))
            .execute(&setup)
            .unwrap();

        assert_eq!(results.iter().filter(|res| res.is_ok()).count(), 1);
        assert_eq!(
            results
                .iter()
                .filter(|res| matches!(res, Err(AppError::SlotConflict)))
                .count(),
            1
        );
        assert_eq!(booked, 1);
    }
}
