//! Miscellaneous helper macros.

/// Shorthand for `Complex64` literals.
///
/// ```ignore
/// c!(1.0)        // 1 + 0i
/// c!(i 2.0)      // 0 + 2i
/// c!(1.0, i 2.0) // 1 + 2i
/// ```
#[macro_export]
macro_rules! c {
    ( i $im:expr ) => {
        num_complex::Complex64::new(0.0, $im)
    };
    ( $re:expr , i $im:expr ) => {
        num_complex::Complex64::new($re, $im)
    };
    ( $re:expr ) => {
        num_complex::Complex64::new($re, 0.0)
    };
}

/// Create a directory and all missing parents, panicking on failure.
#[macro_export]
macro_rules! mkdir {
    ( $dir:expr ) => {
        match std::fs::create_dir_all(&$dir) {
            Ok(_) => { },
            Err(err) => {
                panic!("couldn't create directory {:?}: {}", $dir, err);
            },
        }
    }
}

/// Write a series of named arrays to a `.npz` archive.
///
/// ```ignore
/// write_npz!(
///     outdir.join("data.npz"),
///     arrays: {
///         "time" => &time,
///         "prob" => &prob,
///     }
/// );
/// ```
#[macro_export]
macro_rules! write_npz {
    (
        $path:expr,
        arrays: { $( $name:expr => $arr:expr ),+ $(,)? }
    ) => {
        {
            let mut npz
                = ndarray_npy::NpzWriter::new(
                    std::fs::File::create(&$path)
                        .expect("couldn't create npz file"));
            $(
                npz.add_array($name, $arr)
                    .expect("couldn't write array to npz file");
            )+
            npz.finish().expect("couldn't finish npz file");
        }
    }
}
