use vr_recorder::Error;
use vr_recorder::camera::simulated::Fault;
use vr_recorder::camera::{Backend, SimulatedCamera, TrackedCamera, open_camera};
use vr_recorder::types::FrameType;

#[test]
fn test_simulated_frame_size_and_intrinsics() {
    let camera = SimulatedCamera::new(100, 50, 4);
    let size = camera.frame_size(FrameType::Undistorted).unwrap();
    assert_eq!((size.width, size.height, size.buffer_size), (100, 50, 100 * 50 * 4));

    let intrinsics = camera.intrinsics(FrameType::Undistorted).unwrap();
    assert_eq!((intrinsics.cx, intrinsics.cy), (50.0, 25.0));
    assert_eq!(intrinsics.fx, intrinsics.fy);
}

#[test]
fn test_simulated_frames_are_deterministic() {
    let mut a = SimulatedCamera::new(8, 4, 4);
    let mut b = SimulatedCamera::new(8, 4, 4);
    let mut buf_a = vec![0u8; 128];
    let mut buf_b = vec![0u8; 128];

    let header_a = a.read_frame(FrameType::Undistorted, &mut buf_a).unwrap();
    let header_b = b.read_frame(FrameType::Undistorted, &mut buf_b).unwrap();
    assert_eq!(header_a, header_b);
    assert_eq!(buf_a, buf_b);
    assert_eq!(buf_a, a.frame_bytes(header_a.sequence));

    let next = a.read_frame(FrameType::Undistorted, &mut buf_a).unwrap();
    assert_eq!(next.sequence, header_a.sequence + 1);
    assert_ne!(buf_a, buf_b);
}

#[test]
fn test_simulated_pose_orbits_at_head_height() {
    for sequence in [0, 1, 17, 500] {
        let pose = SimulatedCamera::pose_at(sequence);
        let [x, y, z] = pose.translation();
        assert!(((x * x + z * z).sqrt() - 0.5).abs() < 1e-5);
        assert_eq!(y, 1.6);
        let rotation = pose.to_na_matrix().fixed_view::<3, 3>(0, 0).into_owned();
        assert!((rotation.determinant() - 1.0).abs() < 1e-5);
    }
}

#[test]
fn test_simulated_faults_come_first() {
    let mut camera = SimulatedCamera::new(4, 4, 3).with_faults([Fault::NoFrame, Fault::Camera(105)]);
    let mut buffer = vec![0u8; 48];

    assert!(matches!(
        camera.read_frame(FrameType::Distorted, &mut buffer),
        Err(Error::NoFrameAvailable)
    ));
    assert!(matches!(
        camera.read_frame(FrameType::Distorted, &mut buffer),
        Err(Error::Camera { code: 105, .. })
    ));
    let header = camera.read_frame(FrameType::Distorted, &mut buffer).unwrap();
    assert_eq!(header.sequence, 1);
    assert_eq!(header.bytes_per_pixel, 3);
}

#[test]
fn test_simulated_rejects_small_buffer() {
    let mut camera = SimulatedCamera::new(4, 4, 4);
    let mut buffer = vec![0u8; 10];
    assert!(matches!(
        camera.read_frame(FrameType::Undistorted, &mut buffer),
        Err(Error::BufferTooSmall {
            expected: 64,
            actual: 10
        })
    ));
}

#[test]
fn test_open_simulated_backend() {
    let camera = open_camera(Backend::Simulated, 0).unwrap();
    let size = camera.frame_size(FrameType::Undistorted).unwrap();
    assert_eq!((size.width, size.height), (612, 460));
}

#[test]
#[cfg(not(feature = "openvr"))]
fn test_openvr_backend_needs_feature() {
    assert!(matches!(
        open_camera(Backend::OpenVr, 0),
        Err(Error::BackendUnavailable(_))
    ));
}
