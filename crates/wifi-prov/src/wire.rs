//! Wire codecs for the status message, scan results, and credentials.

use crate::types::{
    Credentials, ProvError, ProvResult, ProvState, ScanResult, Security, PSK_MAX_LEN,
    SSID_MAX_LEN,
};

/// Encode `(state, ip)` into a 5-byte status message: state code, then
/// the IPv4 address in order. Fails `NoBufferSpace` if `out` is smaller.
pub fn encode_status(state: ProvState, ip: [u8; 4], out: &mut [u8]) -> ProvResult<usize> {
    if out.len() < 5 {
        return Err(ProvError::NoBufferSpace);
    }
    out[0] = state as u8;
    out[1..5].copy_from_slice(&ip);
    Ok(5)
}

pub fn decode_status(buf: &[u8]) -> ProvResult<(ProvState, [u8; 4])> {
    if buf.len() < 5 {
        return Err(ProvError::InvalidParameter);
    }
    let state = ProvState::from_code(buf[0])?;
    let mut ip = [0u8; 4];
    ip.copy_from_slice(&buf[1..5]);
    Ok((state, ip))
}

/// Encode a scan result: `ssid_len, ssid, rssi, security, channel`.
pub fn encode_scan_result(result: &ScanResult, out: &mut [u8]) -> ProvResult<usize> {
    let n = result.ssid.len();
    if n == 0 || n > SSID_MAX_LEN {
        return Err(ProvError::InvalidParameter);
    }
    let total = n + 4;
    if out.len() < total {
        return Err(ProvError::NoBufferSpace);
    }
    out[0] = n as u8;
    out[1..1 + n].copy_from_slice(&result.ssid);
    out[1 + n] = result.rssi as u8;
    out[2 + n] = result.security as u8;
    out[3 + n] = result.channel;
    Ok(total)
}

pub fn decode_scan_result(buf: &[u8]) -> ProvResult<ScanResult> {
    if buf.is_empty() {
        return Err(ProvError::InvalidParameter);
    }
    let n = buf[0] as usize;
    if n == 0 || n > SSID_MAX_LEN || buf.len() < n + 4 {
        return Err(ProvError::InvalidParameter);
    }
    Ok(ScanResult {
        ssid: buf[1..1 + n].to_vec(),
        rssi: buf[1 + n] as i8,
        security: Security::from_code(buf[2 + n])?,
        channel: buf[3 + n],
    })
}

/// Encode credentials: `ssid_len, ssid, psk_len, psk, security`.
pub fn encode_credentials(cred: &Credentials, out: &mut [u8]) -> ProvResult<usize> {
    let m = cred.ssid.len();
    let p = cred.psk.len();
    if m == 0 || m > SSID_MAX_LEN || p > PSK_MAX_LEN {
        return Err(ProvError::InvalidParameter);
    }
    let total = m + p + 3;
    if out.len() < total {
        return Err(ProvError::NoBufferSpace);
    }
    out[0] = m as u8;
    out[1..1 + m].copy_from_slice(&cred.ssid);
    out[1 + m] = p as u8;
    out[2 + m..2 + m + p].copy_from_slice(&cred.psk);
    out[2 + m + p] = cred.security_code;
    Ok(total)
}

pub fn decode_credentials(buf: &[u8]) -> ProvResult<Credentials> {
    if buf.is_empty() {
        return Err(ProvError::InvalidParameter);
    }
    let m = buf[0] as usize;
    if m == 0 || m > SSID_MAX_LEN || buf.len() < m + 2 {
        return Err(ProvError::InvalidParameter);
    }
    let p = buf[1 + m] as usize;
    if p > PSK_MAX_LEN || buf.len() < m + p + 3 {
        return Err(ProvError::InvalidParameter);
    }
    Ok(Credentials {
        ssid: buf[1..1 + m].to_vec(),
        psk: buf[2 + m..2 + m + p].to_vec(),
        security_code: buf[2 + m + p],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_result_round_trips() {
        let orig = ScanResult {
            ssid: b"MyWiFi".to_vec(),
            rssi: -42,
            security: Security::Wpa2Psk,
            channel: 6,
        };
        let mut buf = [0u8; 64];
        let len = encode_scan_result(&orig, &mut buf).unwrap();
        let decoded = decode_scan_result(&buf[..len]).unwrap();
        assert_eq!(decoded, orig);
    }

    #[test]
    fn status_round_trips_with_connected_state() {
        let ip = [192, 168, 1, 42];
        let mut buf = [0u8; 8];
        let len = encode_status(ProvState::Connected, ip, &mut buf).unwrap();
        assert_eq!(len, 5);
        assert_eq!(buf[0], ProvState::Connected as u8);
        assert_eq!(&buf[1..5], &ip);
        let (state, decoded_ip) = decode_status(&buf[..len]).unwrap();
        assert_eq!(state, ProvState::Connected);
        assert_eq!(decoded_ip, ip);
    }

    #[test]
    fn credentials_round_trip_with_empty_psk() {
        let orig = Credentials {
            ssid: b"OpenNet".to_vec(),
            psk: Vec::new(),
            security_code: Security::None as u8,
        };
        let mut buf = [0u8; 64];
        let len = encode_credentials(&orig, &mut buf).unwrap();
        let decoded = decode_credentials(&buf[..len]).unwrap();
        assert_eq!(decoded, orig);
    }

    #[test]
    fn decode_truncated_scan_result_is_invalid_parameter() {
        let buf = [6u8, b'A'];
        assert_eq!(
            decode_scan_result(&buf),
            Err(ProvError::InvalidParameter)
        );
    }

    #[test]
    fn decode_truncated_credentials_is_invalid_parameter() {
        let buf = [5u8, b'A', b'B'];
        assert_eq!(
            decode_credentials(&buf),
            Err(ProvError::InvalidParameter)
        );
    }

    #[test]
    fn encode_scan_result_with_small_buffer_is_no_buffer_space() {
        let result = ScanResult {
            ssid: b"Test".to_vec(),
            rssi: -50,
            security: Security::None,
            channel: 1,
        };
        let mut buf = [0u8; 2];
        assert_eq!(
            encode_scan_result(&result, &mut buf),
            Err(ProvError::NoBufferSpace)
        );
    }

    #[test]
    fn max_length_ssid_round_trips() {
        let orig = ScanResult {
            ssid: vec![b'X'; SSID_MAX_LEN],
            rssi: -80,
            security: Security::Wpa3Sae,
            channel: 36,
        };
        let mut buf = [0u8; 64];
        let len = encode_scan_result(&orig, &mut buf).unwrap();
        let decoded = decode_scan_result(&buf[..len]).unwrap();
        assert_eq!(decoded.ssid.len(), SSID_MAX_LEN);
    }
}
