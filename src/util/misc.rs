use std::fmt;

use crate::error;

pub type Res<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub fn next_value<T>(it: &mut std::slice::Iter<'_, std::string::String>, opt: &str) -> T
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    let n = it
        .next()
        .unwrap_or_else(|| error_exit(format!("{}: value missing", opt)));
    n.parse()
        .unwrap_or_else(|e| error_exit(format!("{}: {} '{}'", opt, e, n)))
}

pub fn error_exit<T: fmt::Display, U>(t: T) -> U {
    error!("{}", t);
    std::process::exit(1);
}

pub fn write_to_file(file_path: &str, data: &str) -> Res {
    use std::io::Write;
    let path = std::path::Path::new(file_path);
    if let Some(prefix) = path.parent() {
        std::fs::create_dir_all(prefix)?;
    }
    let mut f = std::fs::File::create(path)?;
    write!(f, "{}", data)?;
    Ok(())
}

pub fn vec_count<T: PartialEq>(v: &[T], e: &T) -> usize {
    v.iter().filter(|&n| n == e).count()
}

pub fn vec_to_string<T: fmt::Display>(v: &[T]) -> String {
    let vs: Vec<String> = v.iter().map(|x| format!("{}", x)).collect();
    "[".to_string() + &vs.join(", ") + "]"
}

// vから値がeの要素をn個削除. 足りない場合は何もせずfalseを返却
pub fn vec_remove_n<T: PartialEq>(v: &mut Vec<T>, e: &T, n: usize) -> bool {
    if vec_count(v, e) < n {
        return false;
    }
    for _ in 0..n {
        if let Some(i) = v.iter().position(|x| x == e) {
            v.remove(i);
        }
    }
    true
}

// 直積 vvのいずれかが空の場合は空のVecを返却
pub fn cartesian_product<T>(vv: &[Vec<T>]) -> Vec<Vec<&T>> {
    if vv.is_empty() || vv.iter().any(|v| v.is_empty()) {
        return vec![];
    }

    let lens: Vec<usize> = vv.iter().map(|l| l.len()).collect();
    let mut idxs = vec![0; vv.len()];
    let mut i = idxs.len() - 1;
    let mut res = vec![];
    loop {
        let mut v = vec![];
        for (i1, &i2) in idxs.iter().enumerate() {
            v.push(&vv[i1][i2]);
        }
        res.push(v);

        // increment idxs
        loop {
            if idxs[i] < lens[i] - 1 {
                idxs[i] += 1;
                i = idxs.len() - 1;
                break;
            } else {
                idxs[i] = 0;
                if i == 0 {
                    return res;
                }
            }
            i -= 1;
        }
    }
}

#[test]
fn test_vec_remove_n() {
    let mut v = vec![1, 2, 2, 3, 2];
    assert!(vec_remove_n(&mut v, &2, 2));
    assert_eq!(v, vec![1, 3, 2]);
    assert!(!vec_remove_n(&mut v, &1, 2));
    assert_eq!(v, vec![1, 3, 2]);
}

#[test]
fn test_cartesian_product() {
    let vv = vec![vec![1, 2], vec![3], vec![4, 5]];
    let res = cartesian_product(&vv);
    assert_eq!(res.len(), 4);
    assert_eq!(res[0], vec![&1, &3, &4]);
    assert_eq!(res[3], vec![&2, &3, &5]);
    assert!(cartesian_product(&[vec![1], vec![]]).is_empty());
}
