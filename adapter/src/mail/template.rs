use chrono::{Datelike, NaiveDate, Weekday};
use kernel::notification::{NotificationKind, NotificationPayload};

pub struct RenderedMail {
    pub subject: String,
    pub body: String,
}

pub fn render(kind: NotificationKind, payload: &NotificationPayload) -> RenderedMail {
    let NotificationPayload {
        reference_code,
        name,
        area,
        date,
        start_time,
        end_time,
        ..
    } = payload;
    let date = spanish_long_date(*date);

    match kind {
        NotificationKind::Submitted => RenderedMail {
            subject: "¡Gracias por tu reservación en UNDelta!".into(),
            body: format!(
                "Hola {name},\n\n\
                 Hemos recibido tu solicitud de reservación en UNDelta. \
                 Te avisaremos cuando sea confirmada.\n\n\
                 Estado: PENDIENTE\n\n\
                 ID de Reservación: {reference_code}\n\
                 Área: {area}\n\
                 Fecha: {date}\n\
                 Horario: {start_time} - {end_time}\n\n\
                 Puedes buscar tu reservación usando tu nombre o ID.\n\n\
                 Saludos,\nEquipo UNDelta\n\n\
                 Este es un email automático, por favor no respondas a este mensaje."
            ),
        },
        NotificationKind::Confirmed => RenderedMail {
            subject: "Tu reservación ha sido CONFIRMADA".into(),
            body: format!(
                "Hola {name},\n\n\
                 Tu reservación {reference_code} para {area} el día {date} ha sido confirmada.\n\
                 Horario: {start_time} - {end_time}\n\n\
                 ¡Te esperamos!\n\nEquipo UNDelta"
            ),
        },
        NotificationKind::Rejected => RenderedMail {
            subject: "Tu reservación no pudo ser aprobada".into(),
            body: format!(
                "Hola {name},\n\n\
                 Lamentamos informarte que tu reservación {reference_code} para {area} \
                 el día {date} ({start_time} - {end_time}) fue rechazada.\n\
                 Puedes solicitar otro horario cuando quieras.\n\nEquipo UNDelta"
            ),
        },
    }
}

// e.g. "miércoles, 15 de enero de 2030"
fn spanish_long_date(date: NaiveDate) -> String {
    const MONTHS: [&str; 12] = [
        "enero",
        "febrero",
        "marzo",
        "abril",
        "mayo",
        "junio",
        "julio",
        "agosto",
        "septiembre",
        "octubre",
        "noviembre",
        "diciembre",
    ];
    let weekday = match date.weekday() {
        Weekday::Mon => "lunes",
        Weekday::Tue => "martes",
        Weekday::Wed => "miércoles",
        Weekday::Thu => "jueves",
        Weekday::Fri => "viernes",
        Weekday::Sat => "sábado",
        Weekday::Sun => "domingo",
    };
    format!(
        "{weekday}, {} de {} de {}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::model::{id::ReservationId, reservation::Area};

    fn payload() -> NotificationPayload {
        let reservation_id: ReservationId = "67e55044-10b1-426f-9247-bb680e5fe0c8".parse().unwrap();
        NotificationPayload {
            reservation_id,
            reference_code: reservation_id.reference_code(),
            name: "Juan Pérez".into(),
            area: Area::Auditorio,
            date: NaiveDate::from_ymd_opt(2030, 1, 15).unwrap(),
            start_time: "10:00".parse().unwrap(),
            end_time: "11:00".parse().unwrap(),
        }
    }

    #[test]
    fn submitted_mail_quotes_reference_and_schedule() {
        let mail = render(NotificationKind::Submitted, &payload());
        assert!(mail.subject.contains("Gracias"));
        assert!(mail.body.contains("Hola Juan Pérez"));
        assert!(mail.body.contains("#0E5FE0C8"));
        assert!(mail.body.contains("Área: Auditorio"));
        assert!(mail.body.contains("martes, 15 de enero de 2030"));
        assert!(mail.body.contains("10:00 - 11:00"));
    }

    #[test]
    fn decision_mails_differ_by_kind() {
        let confirmed = render(NotificationKind::Confirmed, &payload());
        let rejected = render(NotificationKind::Rejected, &payload());
        assert!(confirmed.subject.contains("CONFIRMADA"));
        assert!(rejected.body.contains("rechazada"));
        assert_ne!(confirmed.subject, rejected.subject);
    }
}
