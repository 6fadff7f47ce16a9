//! Wireless extension ioctls on an `AF_INET` control socket

use std::ffi::c_void;
use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::time::Duration;

use libc::{c_char, c_int, IFNAMSIZ};
use tracing::{debug, trace};

use crate::scan::{ChannelError, FetchError, ReadySignal, ScanChannel};

const SIOCGIWRANGE: u32 = 0x8B0B;
const SIOCSIWSCAN: u32 = 0x8B18;
const SIOCGIWSCAN: u32 = 0x8B19;

/// Twice sizeof(struct iw_range), so any extension version fits
const RANGE_BUFFER_SIZE: usize = 2048;

/// Offset of `we_version_compiled` in struct iw_range
const RANGE_WE_VERSION_OFFSET: usize = 280;

/// struct iw_point
#[repr(C)]
#[derive(Clone, Copy)]
struct IwPoint {
    pointer: *mut c_void,
    length: u16,
    flags: u16,
}

/// union iwreq_data, sized by its largest members (iw_point, sockaddr)
#[repr(C)]
#[derive(Clone, Copy)]
union IwReqData {
    data: IwPoint,
    raw: [u8; 16],
}

/// struct iwreq
#[repr(C)]
struct IwReq {
    ifr_name: [c_char; IFNAMSIZ],
    u: IwReqData,
}

/// Scan channel for one interface using the wireless extension ioctls
pub struct WextChannel {
    socket: OwnedFd,
    interface: String,
    ifr_name: [c_char; IFNAMSIZ],
}

impl WextChannel {
    /// Open a control socket for `interface`
    pub fn open(interface: &str) -> io::Result<Self> {
        let ifr_name = interface_name(interface)?;

        // SAFETY: socket(2) takes no pointers, the result is checked below
        let fd = unsafe { libc::socket(libc::AF_INET, libc::SOCK_DGRAM | libc::SOCK_CLOEXEC, 0) };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }
        // SAFETY: fd was just returned by socket(2) and is owned by nobody else
        let socket = unsafe { OwnedFd::from_raw_fd(fd) };

        debug!("Opened wireless extension socket for {}", interface);
        Ok(Self {
            socket,
            interface: interface.to_string(),
            ifr_name,
        })
    }

    /// Request with the interface name set and an empty payload
    fn request(&self) -> IwReq {
        IwReq {
            ifr_name: self.ifr_name,
            u: IwReqData { raw: [0; 16] },
        }
    }

    /// Request pointing the kernel at `buffer`
    fn point_request(&self, buffer: &mut [u8]) -> IwReq {
        let mut req = self.request();
        req.u.data = IwPoint {
            pointer: buffer.as_mut_ptr().cast(),
            // iw_point lengths are 16 bits wide
            length: buffer.len().min(u16::MAX as usize) as u16,
            flags: 0,
        };
        req
    }

    fn ioctl(&self, request: u32, req: &mut IwReq) -> io::Result<()> {
        // SAFETY: req is a valid iwreq and any buffer it points to outlives the call
        let ret = unsafe { libc::ioctl(self.socket.as_raw_fd(), request as _, req as *mut IwReq) };
        if ret < 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(())
        }
    }
}

impl ScanChannel for WextChannel {
    fn protocol_version(&mut self) -> Result<u8, ChannelError> {
        let mut range = vec![0u8; RANGE_BUFFER_SIZE];
        let mut req = self.point_request(&mut range);
        self.ioctl(SIOCGIWRANGE, &mut req)?;

        let version = range[RANGE_WE_VERSION_OFFSET];
        debug!("{} reports wireless extension version {}", self.interface, version);
        Ok(version)
    }

    fn trigger(&mut self) -> Result<(), ChannelError> {
        let mut req = self.request();
        self.ioctl(SIOCSIWSCAN, &mut req).map_err(|e| {
            if e.raw_os_error() == Some(libc::EPERM) {
                ChannelError::PermissionDenied
            } else {
                ChannelError::Io(e)
            }
        })?;

        debug!("Triggered scan on {}", self.interface);
        Ok(())
    }

    fn wait_ready(&mut self, timeout: Duration) -> Result<ReadySignal, ChannelError> {
        let mut pfd = libc::pollfd {
            fd: self.socket.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        let timeout_ms = timeout.as_millis().min(c_int::MAX as u128) as c_int;

        // SAFETY: pfd is a single valid pollfd
        let ret = unsafe { libc::poll(&mut pfd, 1, timeout_ms) };
        match ret {
            0 => Ok(ReadySignal::TimedOut),
            n if n > 0 => {
                trace!("Socket for {} readable (revents 0x{:x})", self.interface, pfd.revents);
                Ok(ReadySignal::Ready)
            }
            _ => {
                let err = io::Error::last_os_error();
                match err.raw_os_error() {
                    Some(libc::EINTR) | Some(libc::EAGAIN) => Ok(ReadySignal::Interrupted),
                    _ => Err(ChannelError::Io(err)),
                }
            }
        }
    }

    fn fetch(&mut self, buffer: &mut [u8]) -> Result<usize, FetchError> {
        let mut req = self.point_request(buffer);
        match self.ioctl(SIOCGIWSCAN, &mut req) {
            // SAFETY: the data member is the one set by point_request and
            // updated by the kernel
            Ok(()) => Ok(unsafe { req.u.data.length } as usize),
            Err(e) => match e.raw_os_error() {
                Some(libc::E2BIG) => {
                    // The driver may report the size it needs
                    // SAFETY: data is the member set by point_request, and on
                    // E2BIG the kernel only rewrites its length
                    let hinted = unsafe { req.u.data.length } as usize;
                    let required = (hinted > buffer.len()).then_some(hinted);
                    Err(FetchError::TooSmall { required })
                }
                Some(libc::EAGAIN) => Err(FetchError::NotReady),
                _ => Err(FetchError::Other(ChannelError::Io(e))),
            },
        }
    }
}

/// Interface name as a NUL-terminated `ifr_name`
fn interface_name(interface: &str) -> io::Result<[c_char; IFNAMSIZ]> {
    let bytes = interface.as_bytes();
    if bytes.is_empty() || bytes.len() >= IFNAMSIZ || bytes.contains(&0) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid interface name '{}'", interface),
        ));
    }

    let mut name = [0 as c_char; IFNAMSIZ];
    for (dst, &src) in name.iter_mut().zip(bytes) {
        *dst = src as c_char;
    }
    Ok(name)
}
